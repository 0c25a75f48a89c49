//! # Message Repository
//!
//! Idempotent persistence and paged query of processed-message records.
//! The transient error subset is retried with exponential backoff inside
//! this layer; non-transient errors surface to the pipeline immediately.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::errors::RepositoryError;

pub use memory::InMemoryRepository;

/// Backoff schedule for transient errors, in seconds
const BACKOFF_SECONDS: [u64; 3] = [1, 2, 4];

/// Lifecycle state of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    Pending,
    Processing,
    Processed,
    Failed,
    DeadLetter,
    Archived,
}

/// Persistent record of one consumed message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedMessage {
    /// Opaque unique identifier, assigned on ingest
    pub id: String,
    /// e.g. "MT103"
    pub message_type: String,
    /// Original payload exactly as received
    pub raw_message: String,
    /// Serialized parsed message; null when parsing failed
    pub parsed_message: Option<serde_json::Value>,
    pub status: MessageStatus,
    pub processed_at: DateTime<Utc>,
    pub error_details: Option<String>,
    /// Scalar metadata: processingDurationMs, transactionReference, ...
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Immutable after the first save
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProcessedMessage {
    pub fn new(id: String, message_type: &str, raw_message: &str) -> Self {
        let now = Utc::now();
        Self {
            id,
            message_type: message_type.to_string(),
            raw_message: raw_message.to_string(),
            parsed_message: None,
            status: MessageStatus::Pending,
            processed_at: now,
            error_details: None,
            metadata: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Query filter; all fields conjunctive, `None` matches everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFilter {
    pub status: Option<MessageStatus>,
    pub message_type: Option<String>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

impl MessageFilter {
    pub fn matches(&self, record: &ProcessedMessage) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(ref message_type) = self.message_type {
            if &record.message_type != message_type {
                return false;
            }
        }
        if let Some(from) = self.from_date {
            if record.processed_at < from {
                return false;
            }
        }
        if let Some(to) = self.to_date {
            if record.processed_at > to {
                return false;
            }
        }
        true
    }
}

/// Repository contract
///
/// `save` is an idempotent upsert keyed by `id`: re-saving replaces the
/// mutable fields in bulk, never duplicates, and leaves `created_at`
/// untouched. Reads observe a consistent snapshot.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn save(&self, message: &ProcessedMessage) -> Result<String, RepositoryError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<ProcessedMessage>, RepositoryError>;

    /// Ordered by `processed_at` descending, with skip/take pagination
    async fn query(
        &self,
        filter: &MessageFilter,
        skip: usize,
        take: usize,
    ) -> Result<Vec<ProcessedMessage>, RepositoryError>;

    /// Fails with `NotFound` when the id is absent
    async fn update_status(&self, id: &str, status: MessageStatus)
        -> Result<(), RepositoryError>;

    async fn count(&self, filter: &MessageFilter) -> Result<u64, RepositoryError>;
}

/// Run an operation, retrying the transient error subset with 1s/2s/4s
/// exponential backoff
pub(crate) async fn with_backoff_retries<T, F, Fut>(
    operation: &str,
    mut run: F,
) -> Result<T, RepositoryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RepositoryError>>,
{
    for (attempt, backoff) in BACKOFF_SECONDS.iter().enumerate() {
        match run().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => {
                warn!(
                    operation,
                    attempt = attempt + 1,
                    backoff_seconds = backoff,
                    error = %err,
                    "transient database error, backing off"
                );
                tokio::time::sleep(Duration::from_secs(*backoff)).await;
            }
            Err(err) => return Err(err),
        }
    }
    // Schedule exhausted; the final attempt's outcome stands
    run().await
}

/// Decorator applying the backoff policy to every repository operation
pub struct RetryingRepository {
    inner: Arc<dyn MessageRepository>,
}

impl RetryingRepository {
    pub fn new(inner: Arc<dyn MessageRepository>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl MessageRepository for RetryingRepository {
    async fn save(&self, message: &ProcessedMessage) -> Result<String, RepositoryError> {
        with_backoff_retries("save", || self.inner.save(message)).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ProcessedMessage>, RepositoryError> {
        with_backoff_retries("get_by_id", || self.inner.get_by_id(id)).await
    }

    async fn query(
        &self,
        filter: &MessageFilter,
        skip: usize,
        take: usize,
    ) -> Result<Vec<ProcessedMessage>, RepositoryError> {
        with_backoff_retries("query", || self.inner.query(filter, skip, take)).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: MessageStatus,
    ) -> Result<(), RepositoryError> {
        with_backoff_retries("update_status", || self.inner.update_status(id, status)).await
    }

    async fn count(&self, filter: &MessageFilter) -> Result<u64, RepositoryError> {
        with_backoff_retries("count", || self.inner.count(filter)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_backoff_retries_transient_then_succeeds() {
        let attempts = std::sync::atomic::AtomicU32::new(0);
        let result = with_backoff_retries("test", || {
            let n = attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(RepositoryError::Transient {
                        message: "timeout".to_string(),
                    })
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_backoff_does_not_retry_permanent_errors() {
        let attempts = std::sync::atomic::AtomicU32::new(0);
        let result: Result<(), _> = with_backoff_retries("test", || {
            attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async move {
                Err(RepositoryError::Storage {
                    message: "constraint violation".to_string(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(RepositoryError::Storage { .. })));
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_filter_matches() {
        let mut record = ProcessedMessage::new("id-1".to_string(), "MT103", "{4:-}");
        record.status = MessageStatus::Processed;

        let filter = MessageFilter {
            status: Some(MessageStatus::Processed),
            ..Default::default()
        };
        assert!(filter.matches(&record));

        let filter = MessageFilter {
            status: Some(MessageStatus::Failed),
            ..Default::default()
        };
        assert!(!filter.matches(&record));

        let filter = MessageFilter {
            message_type: Some("MT202".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&record));
    }
}
