//! Telegram Cleaner Library
//!
//! This library provides tools to:
//! - Resolve Telegram API credentials from config file, env vars or prompt
//! - Manage an exclusive, scoped client session
//! - Enumerate dialogs and pick one from a numbered menu
//! - Collect the current user's messages in a chat (history scan or
//!   server-side search)
//! - Delete them in batches of 100 with flood-wait retry

pub mod config;
pub mod dialogs;
pub mod error;
pub mod purge;
pub mod session;

// Re-export common types
pub use config::{Config, Credentials};
pub use dialogs::{ChatKind, DialogEntry};
pub use error::{Error, Result};
pub use purge::{DeleteAttempt, MessageEntry, PurgeReport, MAX_DELETE_BATCH};
pub use session::{ClientSession, SessionLock};

pub mod commands;
