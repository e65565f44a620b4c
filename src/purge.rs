//! Message retrieval and batch deletion.
//!
//! The backend caps a delete call at 100 ids, so the collected ids are
//! partitioned into fixed-size batches. Flood control is handled as data,
//! not as control flow: every attempt yields `Deleted`, `RateLimited` or
//! `Fatal`, and the driver retries the same batch after the signaled wait.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use grammers_client::types::{Chat, PackedChat};
use grammers_client::{Client, InvocationError};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Maximum number of message ids the backend accepts per delete call.
pub const MAX_DELETE_BATCH: usize = 100;

/// Wait applied when the backend signals flood control without a duration.
pub const DEFAULT_FLOOD_WAIT: Duration = Duration::from_secs(30);

/// A message reference as collected during retrieval.
#[derive(Debug, Clone)]
pub struct MessageEntry {
    pub id: i32,
    pub from_self: bool,
    pub date: Option<DateTime<Utc>>,
    pub preview: String,
}

impl MessageEntry {
    pub fn new(id: i32, from_self: bool) -> Self {
        Self {
            id,
            from_self,
            date: None,
            preview: String::new(),
        }
    }
}

/// Keep only the messages authored by the current user, preserving order.
pub fn own_messages(entries: Vec<MessageEntry>) -> Vec<MessageEntry> {
    entries.into_iter().filter(|e| e.from_self).collect()
}

/// Outcome of one delete attempt for one batch.
#[derive(Debug)]
pub enum DeleteAttempt {
    /// The batch went through; carries the number of messages the server
    /// reports as deleted.
    Deleted(usize),
    /// Flood control: pause at least this long, then retry the same batch.
    RateLimited(Duration),
    /// Unrecoverable; aborts the run.
    Fatal(Error),
}

/// Something that can delete one batch of message ids.
#[async_trait]
pub trait MessageDeleter {
    async fn delete_batch(&mut self, ids: &[i32]) -> DeleteAttempt;
}

/// Summary of a purge run. `Ok(report)` from the driver means every batch
/// succeeded; partial failure is always an `Err`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PurgeReport {
    pub requested: usize,
    pub deleted: usize,
    pub batches: usize,
    pub retries: usize,
}

/// Delete `ids` in fixed-size batches, pausing and retrying on flood waits.
///
/// A rate-limited batch is retried with the same ids; no batch is skipped
/// or issued twice.
pub async fn delete_in_batches<D: MessageDeleter + Send>(
    deleter: &mut D,
    ids: &[i32],
) -> Result<PurgeReport> {
    let mut report = PurgeReport {
        requested: ids.len(),
        ..Default::default()
    };

    for batch in ids.chunks(MAX_DELETE_BATCH) {
        loop {
            match deleter.delete_batch(batch).await {
                DeleteAttempt::Deleted(count) => {
                    report.deleted += count;
                    report.batches += 1;
                    debug!(batch_len = batch.len(), deleted = count, "batch deleted");
                    break;
                }
                DeleteAttempt::RateLimited(wait) => {
                    report.retries += 1;
                    warn!(
                        "Rate limited, pausing {}s before retrying the batch",
                        wait.as_secs()
                    );
                    tokio::time::sleep(wait).await;
                }
                DeleteAttempt::Fatal(err) => return Err(err),
            }
        }
    }

    Ok(report)
}

/// Deleter backed by a live Telegram chat.
pub struct ChatDeleter {
    client: Client,
    chat: PackedChat,
}

impl ChatDeleter {
    pub fn new(client: &Client, chat: &Chat) -> Self {
        Self {
            client: client.clone(),
            chat: chat.pack(),
        }
    }
}

#[async_trait]
impl MessageDeleter for ChatDeleter {
    async fn delete_batch(&mut self, ids: &[i32]) -> DeleteAttempt {
        match self.client.delete_messages(self.chat, ids).await {
            Ok(count) => DeleteAttempt::Deleted(count),
            Err(err) => classify_delete_error(err),
        }
    }
}

/// Map an RPC failure to a retry decision. Flood waits carry the suggested
/// pause; anything else is fatal.
fn classify_delete_error(err: InvocationError) -> DeleteAttempt {
    if let InvocationError::Rpc(rpc) = &err {
        if rpc.name.starts_with("FLOOD") {
            let wait = rpc
                .value
                .map(|secs| Duration::from_secs(u64::from(secs)))
                .or_else(|| parse_flood_wait_seconds(&err.to_string()).map(Duration::from_secs))
                .unwrap_or(DEFAULT_FLOOD_WAIT);
            return DeleteAttempt::RateLimited(wait);
        }
    }
    DeleteAttempt::Fatal(err.into())
}

/// Extract flood wait seconds from an error string (best-effort)
pub fn parse_flood_wait_seconds(error: &str) -> Option<u64> {
    if let Some(idx) = error.find("FLOOD_WAIT_") {
        let start = idx + "FLOOD_WAIT_".len();
        let secs = error[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>();
        if let Ok(v) = secs.parse::<u64>() {
            return Some(v);
        }
    }

    if let Some(idx) = error.find("value:") {
        let start = idx + "value:".len();
        let secs = error[start..]
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>();
        if let Ok(v) = secs.parse::<u64>() {
            return Some(v);
        }
    }

    None
}

/// Deep scan: walk the full history and keep the current user's messages.
///
/// `limit` bounds how many messages are scanned; 0 means unlimited.
pub async fn collect_own_messages_deep(
    client: &Client,
    chat: &Chat,
    limit: usize,
) -> Result<Vec<MessageEntry>> {
    let mut entries = Vec::new();
    let mut scanned = 0usize;
    let mut iter = client.iter_messages(chat);

    while let Some(message) = iter.next().await? {
        scanned += 1;
        entries.push(MessageEntry {
            id: message.id(),
            from_self: message.outgoing(),
            date: Some(message.date()),
            preview: truncate(message.text(), 50),
        });
        if limit > 0 && scanned >= limit {
            break;
        }
    }

    debug!(scanned, "history scan finished");
    Ok(own_messages(entries))
}

/// Server search: ask the backend for all messages sent by the current user.
pub async fn collect_own_messages_search(client: &Client, chat: &Chat) -> Result<Vec<MessageEntry>> {
    let mut entries = Vec::new();
    let mut iter = client.search_messages(chat).query("").sent_by_self();

    while let Some(message) = iter.next().await? {
        entries.push(MessageEntry {
            id: message.id(),
            from_self: true,
            date: Some(message.date()),
            preview: truncate(message.text(), 50),
        });
    }

    Ok(entries)
}

/// One-line message preview for progress output.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.is_empty() {
        "[media]".to_string()
    } else if s.chars().count() <= max_len {
        s.replace('\n', " ")
    } else {
        format!(
            "{}...",
            s.chars()
                .take(max_len)
                .collect::<String>()
                .replace('\n', " ")
        )
    }
}
