//! In-memory queue backend
//!
//! Thread-safe FIFO per queue name. FIFO holds under single-producer
//! single-consumer; under concurrent producers ordering across producers is
//! unspecified, but every message is delivered exactly once.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{MessageQueue, QueueStats};
use crate::errors::QueueError;

#[derive(Default)]
struct QueueState {
    messages: VecDeque<String>,
    stats: QueueStats,
}

/// In-memory queue backend for development and tests
pub struct InMemoryQueue {
    queues: Mutex<HashMap<String, QueueState>>,
    healthy: AtomicBool,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
            healthy: AtomicBool::new(true),
        }
    }

    /// Flip backend health; used to exercise outage handling in tests
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Count of messages currently queued under `queue`
    pub fn len(&self, queue: &str) -> usize {
        let queues = self.queues.lock().expect("queue mutex poisoned");
        queues.get(queue).map(|q| q.messages.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, queue: &str) -> bool {
        self.len(queue) == 0
    }

    fn unhealthy_error() -> QueueError {
        QueueError::Unhealthy {
            message: "in-memory backend marked unhealthy".to_string(),
        }
    }
}

#[async_trait]
impl MessageQueue for InMemoryQueue {
    async fn send(&self, queue: &str, payload: &str) -> Result<(), QueueError> {
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(Self::unhealthy_error());
        }
        let mut queues = self.queues.lock().expect("queue mutex poisoned");
        let state = queues.entry(queue.to_string()).or_default();
        state.messages.push_back(payload.to_string());
        state.stats.messages_in_queue = state.messages.len() as u64;
        state.stats.last_updated = Utc::now();
        Ok(())
    }

    async fn receive(&self, queue: &str) -> Result<Option<String>, QueueError> {
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(Self::unhealthy_error());
        }
        let mut queues = self.queues.lock().expect("queue mutex poisoned");
        let state = queues.entry(queue.to_string()).or_default();
        let message = state.messages.pop_front();
        if message.is_some() {
            state.stats.messages_processed += 1;
        }
        state.stats.messages_in_queue = state.messages.len() as u64;
        state.stats.last_updated = Utc::now();
        Ok(message)
    }

    async fn health(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    async fn stats(&self, queue: &str) -> Result<QueueStats, QueueError> {
        let queues = self.queues.lock().expect("queue mutex poisoned");
        Ok(queues
            .get(queue)
            .map(|state| state.stats.clone())
            .unwrap_or_default())
    }
}
