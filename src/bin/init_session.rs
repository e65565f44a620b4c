//! Session initialization binary.

use telegram_cleaner::commands::init_session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    init_session::run().await?;
    Ok(())
}
