//! Dialog enumeration, menu rendering and chat selection.
//!
//! Listing pulls pages from a pager until an empty page comes back; that is
//! the sole termination condition, so every dialog shows up exactly once and
//! in order.

use async_trait::async_trait;
use grammers_client::types::Chat;
use grammers_client::Client;
use serde::Serialize;

use crate::error::{Error, Result};

/// How many dialogs to pull per page.
pub const DIALOG_PAGE_SIZE: usize = 100;

/// Chat kind as shown in the menu. Supergroups surface as channels at the
/// MTProto layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    Private,
    Group,
    Channel,
}

impl ChatKind {
    pub fn parse(raw: &str) -> Result<Option<Self>> {
        match raw.to_ascii_lowercase().as_str() {
            "all" => Ok(None),
            "private" | "user" | "users" => Ok(Some(Self::Private)),
            "group" | "groups" => Ok(Some(Self::Group)),
            "channel" | "channels" | "supergroup" => Ok(Some(Self::Channel)),
            other => Err(Error::InvalidSelection(format!(
                "Unsupported chat kind '{}'. Use all|private|group|channel",
                other
            ))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Group => "group",
            Self::Channel => "channel",
        }
    }
}

/// A chat reference with just enough metadata to render the menu.
#[derive(Debug, Clone, Serialize)]
pub struct DialogEntry {
    pub id: i64,
    pub title: String,
    pub kind: ChatKind,
    #[serde(skip)]
    pub chat: Option<Chat>,
}

impl DialogEntry {
    pub fn new(id: i64, title: &str, kind: ChatKind) -> Self {
        Self {
            id,
            title: title.to_string(),
            kind,
            chat: None,
        }
    }
}

/// A paginated dialog source.
#[async_trait]
pub trait DialogPager {
    /// Fetch the next page; an empty page means the listing is exhausted.
    async fn next_page(&mut self) -> Result<Vec<DialogEntry>>;
}

/// Drain a pager into a single ordered list.
pub async fn collect_dialogs<P: DialogPager + Send>(pager: &mut P) -> Result<Vec<DialogEntry>> {
    let mut dialogs = Vec::new();

    loop {
        let page = pager.next_page().await?;
        if page.is_empty() {
            break;
        }
        dialogs.extend(page);
    }

    Ok(dialogs)
}

/// Pager over the account's dialog list.
pub struct TelegramDialogPager {
    iter: grammers_client::client::dialogs::DialogIter,
}

impl TelegramDialogPager {
    pub fn new(client: &Client) -> Self {
        Self {
            iter: client.iter_dialogs(),
        }
    }
}

#[async_trait]
impl DialogPager for TelegramDialogPager {
    async fn next_page(&mut self) -> Result<Vec<DialogEntry>> {
        let mut page = Vec::new();

        while page.len() < DIALOG_PAGE_SIZE {
            match self.iter.next().await? {
                Some(dialog) => {
                    let chat = dialog.chat();
                    let mut entry =
                        DialogEntry::new(chat.id(), chat.name(), classify_chat(chat));
                    entry.chat = Some(chat.clone());
                    page.push(entry);
                }
                None => break,
            }
        }

        Ok(page)
    }
}

pub fn classify_chat(chat: &Chat) -> ChatKind {
    match chat {
        Chat::User(_) => ChatKind::Private,
        Chat::Group(_) => ChatKind::Group,
        Chat::Channel(_) => ChatKind::Channel,
    }
}

/// Keep only dialogs of the given kind; `None` keeps everything.
pub fn filter_dialogs(dialogs: Vec<DialogEntry>, kind: Option<ChatKind>) -> Vec<DialogEntry> {
    match kind {
        None => dialogs,
        Some(kind) => dialogs.into_iter().filter(|d| d.kind == kind).collect(),
    }
}

/// Render the numbered chat menu (1-based, matching the selection prompt).
pub fn render_menu(dialogs: &[DialogEntry]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Available chats: {}\n", dialogs.len()));
    out.push_str(&format!("{:<5} {:<16} {:<9} Title\n", "#", "ID", "Kind"));
    out.push_str(&"-".repeat(60));
    out.push('\n');

    for (idx, dialog) in dialogs.iter().enumerate() {
        out.push_str(&format!(
            "{:<5} {:<16} {:<9} {}\n",
            idx + 1,
            dialog.id,
            dialog.kind.label(),
            dialog.title
        ));
    }

    out
}

pub fn print_menu(dialogs: &[DialogEntry]) {
    print!("{}", render_menu(dialogs));
}

/// Parse a 1-based menu selection into a 0-based index.
///
/// `0`, non-numbers and indices past the end are rejected; the caller must
/// not have issued any deletion calls yet at this point.
pub fn parse_selection(input: &str, len: usize) -> Result<usize> {
    let number: usize = input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidSelection(format!("'{}' is not a number", input.trim())))?;

    if number == 0 || number > len {
        return Err(Error::InvalidSelection(format!(
            "{} is out of range 1..={}",
            number, len
        )));
    }

    Ok(number - 1)
}
