//! Shared processor state
//!
//! Flags and timestamps shared between the processing loop, the command
//! poller and the status publisher. Lifecycle commands flip `running`;
//! the loop parks itself while stopped and is woken through the notifier.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

/// Status labels surfaced through the control plane
pub const STATUS_RUNNING: &str = "Running";
pub const STATUS_STOPPED: &str = "Stopped";
pub const STATUS_PROCESSING: &str = "Processing";
pub const STATUS_RESTARTING: &str = "Restarting";

/// Mutable state of one processor instance
pub struct ProcessorState {
    running: AtomicBool,
    processing: AtomicBool,
    test_mode_enabled: AtomicBool,
    status_label: Mutex<String>,
    last_processed_at: Mutex<Option<DateTime<Utc>>>,
    resume: Notify,
}

impl ProcessorState {
    pub fn new(test_mode_enabled: bool) -> Self {
        Self {
            running: AtomicBool::new(true),
            processing: AtomicBool::new(false),
            test_mode_enabled: AtomicBool::new(test_mode_enabled),
            status_label: Mutex::new(STATUS_RUNNING.to_string()),
            last_processed_at: Mutex::new(None),
            resume: Notify::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Resume consumption (Start command)
    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
        self.set_label(STATUS_RUNNING);
        self.resume.notify_waiters();
    }

    /// Pause consumption (Stop command); the in-flight message completes
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.set_label(STATUS_STOPPED);
    }

    /// Wait until `start` is called
    pub async fn resumed(&self) {
        self.resume.notified().await;
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    pub fn set_processing(&self, processing: bool) {
        self.processing.store(processing, Ordering::SeqCst);
        self.set_label(if processing {
            STATUS_PROCESSING
        } else if self.is_running() {
            STATUS_RUNNING
        } else {
            STATUS_STOPPED
        });
    }

    pub fn test_mode_enabled(&self) -> bool {
        self.test_mode_enabled.load(Ordering::SeqCst)
    }

    pub fn set_test_mode(&self, enabled: bool) {
        self.test_mode_enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn status_label(&self) -> String {
        self.status_label
            .lock()
            .expect("state mutex poisoned")
            .clone()
    }

    pub fn set_label(&self, label: &str) {
        *self.status_label.lock().expect("state mutex poisoned") = label.to_string();
    }

    pub fn last_processed_at(&self) -> Option<DateTime<Utc>> {
        *self
            .last_processed_at
            .lock()
            .expect("state mutex poisoned")
    }

    pub fn mark_processed_now(&self) {
        *self
            .last_processed_at
            .lock()
            .expect("state mutex poisoned") = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_flags() {
        let state = ProcessorState::new(false);
        assert!(state.is_running());
        assert_eq!(state.status_label(), STATUS_RUNNING);

        state.stop();
        assert!(!state.is_running());
        assert_eq!(state.status_label(), STATUS_STOPPED);

        state.start();
        assert!(state.is_running());
        assert_eq!(state.status_label(), STATUS_RUNNING);
    }

    #[test]
    fn test_processing_label_tracks_running_state() {
        let state = ProcessorState::new(false);
        state.set_processing(true);
        assert_eq!(state.status_label(), STATUS_PROCESSING);
        state.set_processing(false);
        assert_eq!(state.status_label(), STATUS_RUNNING);

        state.stop();
        state.set_processing(true);
        state.set_processing(false);
        assert_eq!(state.status_label(), STATUS_STOPPED);
    }

    #[tokio::test]
    async fn test_resume_wakes_waiter() {
        use std::sync::Arc;
        let state = Arc::new(ProcessorState::new(false));
        state.stop();

        let waiter = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.resumed().await })
        };
        tokio::task::yield_now().await;
        state.start();
        waiter.await.unwrap();
    }
}
