//! Command implementations
//!
//! Each module corresponds to a subcommand in the CLI.

pub mod init_session;
pub mod list_chats;
pub mod purge;

pub use purge::PurgeArgs;
