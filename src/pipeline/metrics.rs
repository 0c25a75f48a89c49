//! Process-wide processing metrics
//!
//! One mutex-guarded object owned by the composition root and shared with
//! the status publisher. The rolling average covers the last 100
//! successful runs; throughput is measured since the metrics start time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Samples kept for the rolling duration average
const ROLLING_WINDOW: usize = 100;

/// Failure classification for the per-type error counters
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ErrorKind {
    ParsingError,
    ValidationError,
    ValidationException,
    DatabaseError,
    UnexpectedError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ParsingError => "ParsingError",
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::ValidationException => "ValidationException",
            ErrorKind::DatabaseError => "DatabaseError",
            ErrorKind::UnexpectedError => "UnexpectedError",
        }
    }
}

#[derive(Debug)]
struct MetricsInner {
    total_processed: u64,
    total_failed: u64,
    durations_ms: VecDeque<f64>,
    errors_by_type: BTreeMap<ErrorKind, u64>,
    /// Completed-queue sends that failed after a successful persist
    forward_failures: u64,
    started_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

impl MetricsInner {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            total_processed: 0,
            total_failed: 0,
            durations_ms: VecDeque::with_capacity(ROLLING_WINDOW),
            errors_by_type: BTreeMap::new(),
            forward_failures: 0,
            started_at: now,
            last_updated: now,
        }
    }
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_processed: u64,
    pub total_failed: u64,
    pub average_processing_time_ms: f64,
    pub messages_per_minute: f64,
    pub errors_by_type: BTreeMap<String, u64>,
    pub forward_failures: u64,
    pub metrics_start_time: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Shared metrics object
#[derive(Debug)]
pub struct ProcessingMetrics {
    inner: Mutex<MetricsInner>,
}

impl Default for ProcessingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsInner::new()),
        }
    }

    pub fn record_success(&self, duration: Duration) {
        let mut inner = self.inner.lock().expect("metrics mutex poisoned");
        inner.total_processed += 1;
        inner.durations_ms.push_back(duration.as_secs_f64() * 1000.0);
        while inner.durations_ms.len() > ROLLING_WINDOW {
            inner.durations_ms.pop_front();
        }
        inner.last_updated = Utc::now();
    }

    pub fn record_failure(&self, kind: ErrorKind) {
        let mut inner = self.inner.lock().expect("metrics mutex poisoned");
        inner.total_failed += 1;
        *inner.errors_by_type.entry(kind).or_insert(0) += 1;
        inner.last_updated = Utc::now();
    }

    pub fn record_forward_failure(&self) {
        let mut inner = self.inner.lock().expect("metrics mutex poisoned");
        inner.forward_failures += 1;
        inner.last_updated = Utc::now();
    }

    /// Zero every counter and restart the throughput clock
    pub fn reset(&self) {
        let mut inner = self.inner.lock().expect("metrics mutex poisoned");
        *inner = MetricsInner::new();
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = self.inner.lock().expect("metrics mutex poisoned");
        let average = if inner.durations_ms.is_empty() {
            0.0
        } else {
            inner.durations_ms.iter().sum::<f64>() / inner.durations_ms.len() as f64
        };
        let elapsed_minutes = (Utc::now() - inner.started_at)
            .num_milliseconds()
            .max(1) as f64
            / 60_000.0;
        MetricsSnapshot {
            total_processed: inner.total_processed,
            total_failed: inner.total_failed,
            average_processing_time_ms: average,
            messages_per_minute: inner.total_processed as f64 / elapsed_minutes,
            errors_by_type: inner
                .errors_by_type
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), *v))
                .collect(),
            forward_failures: inner.forward_failures,
            metrics_start_time: inner.started_at,
            last_updated: inner.last_updated,
        }
    }
}
