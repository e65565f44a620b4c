//! Telegram Cleaner CLI - main entry point

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use telegram_cleaner::commands;

#[derive(Parser)]
#[command(name = "telegram_cleaner")]
#[command(about = "Bulk-delete your own messages from a Telegram chat", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List chats as a numbered menu
    ListChats {
        /// Number of chats to display (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: usize,

        /// Filter by chat kind: all, private, group, channel
        #[arg(short, long, default_value = "all")]
        kind: String,

        /// Output format: table | json | yaml
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Pick a chat and delete all your messages in it
    Purge {
        /// Filter the menu by chat kind: all, private, group, channel
        #[arg(short, long, default_value = "all")]
        kind: String,

        /// Scan the full history and filter client-side (slower, catches
        /// messages the server search misses)
        #[arg(long)]
        deep: bool,

        /// Maximum history messages to scan in deep mode (0 = unlimited)
        #[arg(short, long, default_value = "0")]
        limit: usize,

        /// Dry run - don't actually delete
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Create the session file (interactive login)
    InitSession,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("telegram_cleaner=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ListChats {
            limit,
            kind,
            format,
        } => {
            commands::list_chats::run(limit, &kind, &format).await?;
        }
        Commands::Purge {
            kind,
            deep,
            limit,
            dry_run,
            yes,
        } => {
            commands::purge::run(commands::PurgeArgs {
                kind,
                deep,
                limit,
                dry_run,
                yes,
            })
            .await?;
        }
        Commands::InitSession => {
            commands::init_session::run().await?;
        }
    }

    Ok(())
}
