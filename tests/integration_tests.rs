//! Integration tests for the telegram_cleaner library
//!
//! These tests verify the public API and module interactions against fakes;
//! nothing here talks to Telegram.

use async_trait::async_trait;
use std::time::Duration;

use telegram_cleaner::{
    config::DEFAULT_SESSION_NAME,
    dialogs::{collect_dialogs, filter_dialogs, parse_selection, DialogPager},
    purge::{delete_in_batches, DeleteAttempt, MessageDeleter},
    ChatKind, Config, Credentials, DialogEntry, Error, MessageEntry, PurgeReport,
    MAX_DELETE_BATCH,
};

fn test_config() -> Config {
    Config {
        credentials: Credentials {
            api_id: 12345,
            api_hash: "hash".to_string(),
        },
        session_name: DEFAULT_SESSION_NAME.to_string(),
    }
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_file_names_derive_from_session_name() {
    let config = test_config();
    assert_eq!(config.session_file(), "cleaner.session");
    assert_eq!(config.lock_file(), "cleaner.lock");
}

#[test]
fn test_config_is_clone() {
    let config = test_config();
    let cloned = config.clone();
    assert_eq!(config.session_name, cloned.session_name);
    assert_eq!(config.credentials.api_id, cloned.credentials.api_id);
}

#[test]
fn test_max_delete_batch_is_100() {
    assert_eq!(MAX_DELETE_BATCH, 100);
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_error_variants_display() {
    let errors = vec![
        Error::ConfigError("bad config".into()),
        Error::SessionNotFound("cleaner.session".into()),
        Error::SessionLocked,
        Error::LockError("lock failed".into()),
        Error::TelegramError("api error".into()),
        Error::ChatNotFound("chat123".into()),
        Error::InvalidSelection("0".into()),
        Error::SerializationError("json error".into()),
        Error::AuthorizationRequired,
        Error::Unknown("mystery".into()),
    ];

    for err in errors {
        assert!(!err.to_string().is_empty(), "Error message should not be empty");
    }
}

// ============================================================================
// End-to-end selection flow against fakes
// ============================================================================

struct PagedDialogs {
    pages: Vec<Vec<DialogEntry>>,
}

#[async_trait]
impl DialogPager for PagedDialogs {
    async fn next_page(&mut self) -> telegram_cleaner::Result<Vec<DialogEntry>> {
        if self.pages.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(self.pages.remove(0))
        }
    }
}

struct CountingDeleter {
    calls: Vec<Vec<i32>>,
    flood_once_on_call: Option<usize>,
}

#[async_trait]
impl MessageDeleter for CountingDeleter {
    async fn delete_batch(&mut self, ids: &[i32]) -> DeleteAttempt {
        let call = self.calls.len();
        self.calls.push(ids.to_vec());
        if self.flood_once_on_call == Some(call) {
            self.flood_once_on_call = None;
            DeleteAttempt::RateLimited(Duration::from_secs(3))
        } else {
            DeleteAttempt::Deleted(ids.len())
        }
    }
}

#[tokio::test]
async fn menu_selection_then_batched_delete() {
    // Listing: two pages then empty.
    let mut pager = PagedDialogs {
        pages: vec![
            vec![
                DialogEntry::new(100, "Family", ChatKind::Group),
                DialogEntry::new(200, "News", ChatKind::Channel),
            ],
            vec![DialogEntry::new(300, "Work", ChatKind::Group)],
        ],
    };
    let dialogs = collect_dialogs(&mut pager).await.expect("dialogs");
    let groups = filter_dialogs(dialogs, Some(ChatKind::Group));
    assert_eq!(groups.len(), 2);

    // User picks entry 2 (1-based) = "Work".
    let index = parse_selection("2", groups.len()).expect("selection");
    assert_eq!(groups[index].title, "Work");

    // Author filter keeps only own messages, in order.
    let collected: Vec<MessageEntry> = (1..=230)
        .map(|id| MessageEntry::new(id, id % 2 == 0))
        .collect();
    let own = telegram_cleaner::purge::own_messages(collected);
    assert_eq!(own.len(), 115);

    // Deletion: ceil(115/100) = 2 batches.
    let ids: Vec<i32> = own.iter().map(|e| e.id).collect();
    let mut deleter = CountingDeleter {
        calls: Vec::new(),
        flood_once_on_call: None,
    };
    let report = delete_in_batches(&mut deleter, &ids).await.expect("purge");

    assert_eq!(deleter.calls.len(), 2);
    assert_eq!(deleter.calls.concat(), ids);
    assert_eq!(
        report,
        PurgeReport {
            requested: 115,
            deleted: 115,
            batches: 2,
            retries: 0,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn flood_wait_mid_run_does_not_lose_a_batch() {
    let ids: Vec<i32> = (1..=201).collect();
    let mut deleter = CountingDeleter {
        calls: Vec::new(),
        flood_once_on_call: Some(1),
    };

    let report = delete_in_batches(&mut deleter, &ids).await.expect("purge");

    // Batch 1 ok, batch 2 flooded once then retried, batch 3 ok.
    assert_eq!(deleter.calls.len(), 4);
    assert_eq!(deleter.calls[1], deleter.calls[2]);
    assert_eq!(report.batches, 3);
    assert_eq!(report.retries, 1);
    assert_eq!(report.deleted, 201);
}

#[tokio::test]
async fn invalid_selection_prevents_any_deletion() {
    let dialogs = vec![
        DialogEntry::new(1, "a", ChatKind::Private),
        DialogEntry::new(2, "b", ChatKind::Private),
    ];

    for bad in ["0", "3", "x", ""] {
        assert!(parse_selection(bad, dialogs.len()).is_err());
    }
    // The command flow propagates the error before any deleter exists, so
    // there is nothing to assert on the wire: reaching this line without a
    // deleter having been constructed is the property.
}
