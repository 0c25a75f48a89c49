//! # Queue Abstraction
//!
//! Named-queue contract the pipeline runs against: send, non-blocking
//! receive, health, and per-queue statistics. Two backends ship with the
//! processor: a thread-safe in-memory FIFO for development and tests, and
//! an HTTPS broker client for production.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::QueueError;

pub use http::HttpBrokerQueue;
pub use memory::InMemoryQueue;

/// Per-queue counters surfaced to the status plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub messages_in_queue: u64,
    pub messages_processed: u64,
    pub messages_failed: u64,
    pub last_updated: DateTime<Utc>,
}

impl Default for QueueStats {
    fn default() -> Self {
        Self {
            messages_in_queue: 0,
            messages_processed: 0,
            messages_failed: 0,
            last_updated: Utc::now(),
        }
    }
}

/// The three standard queue names, configurable per deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueNames {
    pub input: String,
    pub completed: String,
    pub dead_letter: String,
}

impl Default for QueueNames {
    fn default() -> Self {
        Self {
            input: "input".to_string(),
            completed: "completed".to_string(),
            dead_letter: "deadLetter".to_string(),
        }
    }
}

/// Message queue contract
///
/// `receive` is non-blocking from the pipeline's point of view: `None`
/// means the queue is empty right now. Backends with long-poll semantics
/// bound their wait internally. Delivery is at-least-once on the broker
/// backend; consumers tolerate re-delivery via idempotent persistence.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    async fn send(&self, queue: &str, payload: &str) -> Result<(), QueueError>;

    async fn receive(&self, queue: &str) -> Result<Option<String>, QueueError>;

    /// Backend-wide health; false pauses consumption
    async fn health(&self) -> bool;

    async fn stats(&self, queue: &str) -> Result<QueueStats, QueueError>;
}
