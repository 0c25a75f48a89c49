//! In-memory repository backend
//!
//! Keeps records in a map behind a mutex. Snapshot semantics fall out of
//! cloning under the lock. A fault-injection hook lets tests drive the
//! transient-retry path.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use super::{MessageFilter, MessageRepository, MessageStatus, ProcessedMessage};
use crate::errors::RepositoryError;

/// In-memory repository for development and tests
#[derive(Default)]
pub struct InMemoryRepository {
    records: Mutex<HashMap<String, ProcessedMessage>>,
    /// When non-zero, the next N mutating operations fail transiently
    fail_transient: AtomicU32,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` mutating operations fail with a transient error
    pub fn inject_transient_failures(&self, count: u32) {
        self.fail_transient.store(count, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_injected_failure(&self) -> Option<RepositoryError> {
        let previous = self
            .fail_transient
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .ok();
        previous.map(|_| RepositoryError::Transient {
            message: "injected transient failure".to_string(),
        })
    }
}

#[async_trait]
impl MessageRepository for InMemoryRepository {
    async fn save(&self, message: &ProcessedMessage) -> Result<String, RepositoryError> {
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }
        let mut records = self.records.lock().expect("repository mutex poisoned");
        let mut stored = message.clone();
        stored.updated_at = Utc::now();
        if let Some(existing) = records.get(&message.id) {
            // created_at is immutable after the first save
            stored.created_at = existing.created_at;
        }
        records.insert(stored.id.clone(), stored);
        Ok(message.id.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ProcessedMessage>, RepositoryError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        Ok(records.get(id).cloned())
    }

    async fn query(
        &self,
        filter: &MessageFilter,
        skip: usize,
        take: usize,
    ) -> Result<Vec<ProcessedMessage>, RepositoryError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        let mut matched: Vec<ProcessedMessage> = records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));
        Ok(matched.into_iter().skip(skip).take(take).collect())
    }

    async fn update_status(
        &self,
        id: &str,
        status: MessageStatus,
    ) -> Result<(), RepositoryError> {
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }
        let mut records = self.records.lock().expect("repository mutex poisoned");
        match records.get_mut(id) {
            Some(record) => {
                record.status = status;
                record.updated_at = Utc::now();
                Ok(())
            }
            None => Err(RepositoryError::NotFound { id: id.to_string() }),
        }
    }

    async fn count(&self, filter: &MessageFilter) -> Result<u64, RepositoryError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        Ok(records.values().filter(|r| filter.matches(r)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(id: &str) -> ProcessedMessage {
        ProcessedMessage::new(id.to_string(), "MT103", "{4:\n:20:X\n-}")
    }

    #[tokio::test]
    async fn test_save_is_idempotent_upsert() {
        let repo = InMemoryRepository::new();
        let mut message = record("id-1");
        repo.save(&message).await.unwrap();
        let first = repo.get_by_id("id-1").await.unwrap().unwrap();

        message.status = MessageStatus::Processed;
        repo.save(&message).await.unwrap();
        repo.save(&message).await.unwrap();

        assert_eq!(repo.len(), 1);
        let stored = repo.get_by_id("id-1").await.unwrap().unwrap();
        assert_eq!(stored.status, MessageStatus::Processed);
        // created_at survives the upsert
        assert_eq!(stored.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_update_status_missing_id() {
        let repo = InMemoryRepository::new();
        let err = repo
            .update_status("absent", MessageStatus::Archived)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::NotFound {
                id: "absent".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_query_orders_and_paginates() {
        let repo = InMemoryRepository::new();
        let base = Utc::now();
        for i in 0..5 {
            let mut message = record(&format!("id-{i}"));
            message.processed_at = base + Duration::seconds(i);
            message.status = MessageStatus::Processed;
            repo.save(&message).await.unwrap();
        }

        let filter = MessageFilter::default();
        let page = repo.query(&filter, 0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        // Descending by processed_at: newest first
        assert_eq!(page[0].id, "id-4");
        assert_eq!(page[1].id, "id-3");

        let page = repo.query(&filter, 4, 10).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "id-0");
    }

    #[tokio::test]
    async fn test_count_with_filter() {
        let repo = InMemoryRepository::new();
        for (id, status) in [
            ("a", MessageStatus::Processed),
            ("b", MessageStatus::Processed),
            ("c", MessageStatus::Failed),
        ] {
            let mut message = record(id);
            message.status = status;
            repo.save(&message).await.unwrap();
        }

        let all = repo.count(&MessageFilter::default()).await.unwrap();
        assert_eq!(all, 3);

        let processed = repo
            .count(&MessageFilter {
                status: Some(MessageStatus::Processed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(processed, 2);
    }

    #[tokio::test]
    async fn test_injected_transient_failures() {
        let repo = InMemoryRepository::new();
        repo.inject_transient_failures(1);
        let err = repo.save(&record("id-1")).await.unwrap_err();
        assert!(err.is_transient());
        // Next save succeeds
        repo.save(&record("id-1")).await.unwrap();
    }
}
