//! First-run session initialization.
//!
//! Creates the session file by running the interactive login flow. Later
//! runs pick the session up automatically and skip login.

use crate::config::Config;
use crate::error::Result;
use crate::session::{ClientSession, SessionLock};

pub async fn run() -> Result<()> {
    let config = Config::resolve()?;
    let _lock = SessionLock::acquire(config.lock_file())?;

    let session = ClientSession::login(&config).await?;

    let me = session.get_me().await?;
    println!(
        "\nSession ready for {} (@{})",
        me.full_name(),
        me.username().unwrap_or("-")
    );
    println!("Session file: {}", config.session_file());
    println!("You can now run `telegram_cleaner list-chats` or `telegram_cleaner purge`.");

    Ok(())
}
