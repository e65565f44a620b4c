//! List the account's dialogs as a numbered menu.

use crate::config::Config;
use crate::dialogs::{
    collect_dialogs, filter_dialogs, print_menu, ChatKind, DialogEntry, TelegramDialogPager,
};
use crate::error::{Error, Result};
use crate::session::{ClientSession, SessionLock};

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    fn parse(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(Error::InvalidSelection(format!(
                "Unsupported format '{}'. Use table|json|yaml",
                other
            ))),
        }
    }
}

pub async fn run(limit: usize, kind: &str, format: &str) -> Result<()> {
    let kind = ChatKind::parse(kind)?;
    let format = OutputFormat::parse(format)?;

    let config = Config::resolve()?;
    let _lock = SessionLock::acquire(config.lock_file())?;
    let session = ClientSession::connect(&config).await?;

    let mut pager = TelegramDialogPager::new(&session);
    let mut dialogs = filter_dialogs(collect_dialogs(&mut pager).await?, kind);
    if limit > 0 {
        dialogs.truncate(limit);
    }

    match format {
        OutputFormat::Table => print_menu(&dialogs),
        OutputFormat::Json => print_json(&dialogs)?,
        OutputFormat::Yaml => print_yaml(&dialogs)?,
    }

    Ok(())
}

fn print_json(dialogs: &[DialogEntry]) -> Result<()> {
    let payload = serde_json::to_string_pretty(dialogs)?;
    println!("{payload}");
    Ok(())
}

fn print_yaml(dialogs: &[DialogEntry]) -> Result<()> {
    let payload = serde_yaml::to_string(dialogs)?;
    println!("{payload}");
    Ok(())
}
