//! Interactive purge: pick a chat, collect your own messages, delete them
//! in batches.

use crate::config::{prompt, Config};
use crate::dialogs::{
    collect_dialogs, filter_dialogs, parse_selection, print_menu, ChatKind, TelegramDialogPager,
};
use crate::error::{Error, Result};
use crate::purge::{
    collect_own_messages_deep, collect_own_messages_search, delete_in_batches, ChatDeleter,
};
use crate::session::{ClientSession, SessionLock};

#[derive(Debug, Clone)]
pub struct PurgeArgs {
    /// Chat kind filter for the menu: all|private|group|channel.
    pub kind: String,
    /// Scan the full history and filter client-side instead of asking the
    /// server for messages from self.
    pub deep: bool,
    /// Cap on how many history messages are scanned in deep mode (0 = all).
    pub limit: usize,
    /// List what would be deleted without issuing delete calls.
    pub dry_run: bool,
    /// Skip the confirmation prompt.
    pub yes: bool,
}

pub async fn run(args: PurgeArgs) -> Result<()> {
    let kind = ChatKind::parse(&args.kind)?;

    let config = Config::resolve()?;
    let _lock = SessionLock::acquire(config.lock_file())?;
    let session = ClientSession::connect(&config).await?;

    // Menu
    let mut pager = TelegramDialogPager::new(&session);
    let dialogs = filter_dialogs(collect_dialogs(&mut pager).await?, kind);
    if dialogs.is_empty() {
        return Err(Error::ChatNotFound("no chats match the filter".to_string()));
    }
    print_menu(&dialogs);

    let input = prompt("Enter the number of the chat to delete messages in: ")?;
    let index = parse_selection(&input, dialogs.len())?;
    let selected = &dialogs[index];
    let chat = selected
        .chat
        .as_ref()
        .ok_or_else(|| Error::ChatNotFound(selected.title.clone()))?;

    println!("Selected: {}", selected.title);

    // Retrieval
    let messages = if args.deep {
        println!("Scanning history of {}...", selected.title);
        collect_own_messages_deep(&session, chat, args.limit).await?
    } else {
        println!("Searching your messages in {}...", selected.title);
        collect_own_messages_search(&session, chat).await?
    };

    if messages.is_empty() {
        println!("No messages of yours found. Nothing to delete.");
        return Ok(());
    }

    println!("Found {} messages.", messages.len());

    if args.dry_run {
        for entry in &messages {
            let date = entry
                .date
                .map(|d| d.format("%d.%m.%Y %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("  WOULD DELETE: {} - {}", date, entry.preview);
        }
        println!("Dry run, nothing deleted.");
        return Ok(());
    }

    if !args.yes {
        let answer = prompt(&format!(
            "Delete {} messages from '{}'? [y/N]: ",
            messages.len(),
            selected.title
        ))?;
        if !matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            println!("Aborted, nothing deleted.");
            return Ok(());
        }
    }

    // Deletion
    println!("Deleting {} messages...", messages.len());
    let ids: Vec<i32> = messages.iter().map(|e| e.id).collect();
    let mut deleter = ChatDeleter::new(&session, chat);
    let report = delete_in_batches(&mut deleter, &ids).await?;

    println!(
        "Done. Deleted {} of {} messages in {} batches ({} flood retries).",
        report.deleted, report.requested, report.batches, report.retries
    );

    Ok(())
}
