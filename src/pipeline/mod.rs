//! # Processing Pipeline
//!
//! The main consume loop: receive from the input queue, parse, validate,
//! check compliance, persist, forward to the completed queue. Any stage
//! failure routes the message to the dead-letter queue with an error
//! envelope and a Failed record; message-local errors never bring the
//! loop down. Queue outages pause consumption with a back-off.

pub mod dead_letter;
pub mod metrics;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::ProcessingSettings;
use crate::parsed_message::ParsedSwiftMessage;
use crate::parser::SwiftParser;
use crate::queue::{MessageQueue, QueueNames};
use crate::repository::{MessageRepository, MessageStatus, ProcessedMessage};
use crate::state::ProcessorState;
use crate::validation::{ComplianceValidator, SyntacticValidator};

pub use dead_letter::DeadLetterEnvelope;
pub use metrics::{ErrorKind, MetricsSnapshot, ProcessingMetrics};

/// Back-off while the queue backend is unhealthy
const OUTAGE_BACKOFF: Duration = Duration::from_secs(5);

/// Why a message failed, and how to report it
struct StageFailure {
    kind: ErrorKind,
    reason: &'static str,
    detail: String,
}

impl StageFailure {
    fn new(kind: ErrorKind, reason: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind,
            reason,
            detail: detail.into(),
        }
    }
}

/// The message processing pipeline
pub struct Pipeline {
    queue: Arc<dyn MessageQueue>,
    repository: Arc<dyn MessageRepository>,
    compliance: ComplianceValidator,
    metrics: Arc<ProcessingMetrics>,
    state: Arc<ProcessorState>,
    queues: QueueNames,
    settings: ProcessingSettings,
}

impl Pipeline {
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        repository: Arc<dyn MessageRepository>,
        compliance: ComplianceValidator,
        metrics: Arc<ProcessingMetrics>,
        state: Arc<ProcessorState>,
        queues: QueueNames,
        settings: ProcessingSettings,
    ) -> Self {
        Self {
            queue,
            repository,
            compliance,
            metrics,
            state,
            queues,
            settings,
        }
    }

    /// Run the consume loop until the shutdown token fires
    ///
    /// The in-flight message always completes; cancellation is only
    /// observed between messages and inside sleeps.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(input_queue = %self.queues.input, "processing pipeline started");
        loop {
            if shutdown.is_cancelled() {
                break;
            }

            if !self.state.is_running() {
                // The sleep arm re-checks the flag in case a Start command
                // landed between the flag read and the notify registration
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = self.state.resumed() => {}
                    _ = tokio::time::sleep(Duration::from_millis(250)) => {}
                }
                continue;
            }

            if !self.queue.health().await {
                warn!("queue backend unhealthy, backing off");
                if self.sleep_cancellable(OUTAGE_BACKOFF, &shutdown).await {
                    break;
                }
                continue;
            }

            match self.queue.receive(&self.queues.input).await {
                Ok(Some(payload)) => {
                    self.process_message(&payload).await;
                }
                Ok(None) => {
                    let idle = Duration::from_millis(
                        self.settings.queue_polling_interval_milliseconds,
                    );
                    if self.sleep_cancellable(idle, &shutdown).await {
                        break;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "queue receive failed, backing off");
                    if self.sleep_cancellable(OUTAGE_BACKOFF, &shutdown).await {
                        break;
                    }
                }
            }
        }
        info!("processing pipeline stopped");
    }

    /// Returns true when the shutdown token fired during the sleep
    async fn sleep_cancellable(&self, duration: Duration, shutdown: &CancellationToken) -> bool {
        tokio::select! {
            _ = shutdown.cancelled() => true,
            _ = tokio::time::sleep(duration) => false,
        }
    }

    /// Process one raw payload end to end
    pub async fn process_message(&self, payload: &str) {
        let started = Instant::now();
        let id = Uuid::new_v4().to_string();
        self.state.set_processing(true);
        debug!(message_id = %id, "message received");

        let mut record = ProcessedMessage::new(id, "MT103", payload);
        record.status = MessageStatus::Processing;

        let outcome = self.run_stages(&mut record, payload, started).await;

        let duration = started.elapsed();
        match outcome {
            Ok(()) => {
                self.metrics.record_success(duration);
                self.state.mark_processed_now();
                info!(
                    message_id = %record.id,
                    elapsed_ms = duration.as_millis() as u64,
                    "message processed"
                );
            }
            Err(failure) => {
                self.metrics.record_failure(failure.kind);
                warn!(
                    message_id = %record.id,
                    reason = failure.reason,
                    detail = %failure.detail,
                    "message failed"
                );
                record.metadata.insert(
                    "processingDurationMs".to_string(),
                    json!(duration.as_millis() as u64),
                );
                self.fail_message(&mut record, &failure, payload).await;
            }
        }
        self.state.set_processing(false);
    }

    async fn run_stages(
        &self,
        record: &mut ProcessedMessage,
        payload: &str,
        started: Instant,
    ) -> Result<(), StageFailure> {
        // Parse (framing + decoding), with bounded fixed-delay retries
        let parsed = self
            .retry_fixed("parse", || async { SwiftParser::parse_auto(payload) })
            .await
            .map_err(|err| {
                StageFailure::new(
                    ErrorKind::ParsingError,
                    "Parsing failed",
                    err.to_string(),
                )
            })?;

        record.message_type = format!("MT{}", parsed.message_type());

        // Syntactic validation; a panic inside the validator is classified
        // separately from rule violations
        let report = match &parsed {
            ParsedSwiftMessage::MT103(message) => {
                catch_unwind(AssertUnwindSafe(|| {
                    SyntacticValidator::validate(&message.fields)
                }))
            }
        };
        let report = report.map_err(|panic| {
            StageFailure::new(
                ErrorKind::ValidationException,
                "Validation failed unexpectedly",
                panic_message(panic),
            )
        })?;
        if !report.is_valid() {
            return Err(StageFailure::new(
                ErrorKind::ValidationError,
                "Validation failed",
                report.summary(),
            ));
        }

        // Compliance; a FAIL is handled exactly like a validation failure
        let compliance = match &parsed {
            ParsedSwiftMessage::MT103(message) => self.compliance.validate(&message.fields),
        };
        if !compliance.passed() {
            return Err(StageFailure::new(
                ErrorKind::ValidationError,
                "Compliance failed",
                compliance.summary(),
            ));
        }

        // Persist the authoritative record
        record.status = MessageStatus::Processed;
        record.processed_at = Utc::now();
        record.parsed_message = serde_json::to_value(&parsed).ok();
        record.metadata.insert(
            "transactionReference".to_string(),
            json!(parsed.transaction_reference()),
        );
        record
            .metadata
            .insert("amount".to_string(), json!(parsed.amount()));
        record
            .metadata
            .insert("currency".to_string(), json!(parsed.currency()));
        record.metadata.insert(
            "processingDurationMs".to_string(),
            json!(started.elapsed().as_millis() as u64),
        );

        let timeout = Duration::from_secs(self.settings.message_processing_timeout_seconds);
        let saved = self
            .retry_fixed("persist", || async {
                match tokio::time::timeout(timeout, self.repository.save(record)).await {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(_) => Err(format!("save timed out after {}s", timeout.as_secs())),
                }
            })
            .await;
        saved.map_err(|err| {
            StageFailure::new(ErrorKind::DatabaseError, "Database persistence failed", err)
        })?;

        // Forward the raw payload downstream. The stored record is the
        // authoritative outcome; a forwarding failure is logged and
        // counted but does not fail the message.
        let forwarded = self
            .retry_fixed("forward", || async {
                self.queue.send(&self.queues.completed, payload).await
            })
            .await;
        if let Err(err) = forwarded {
            self.metrics.record_forward_failure();
            error!(
                message_id = %record.id,
                error = %err,
                "completed-queue forward failed; record already persisted"
            );
        }

        Ok(())
    }

    /// Route a failed message: dead-letter envelope plus Failed record
    async fn fail_message(
        &self,
        record: &mut ProcessedMessage,
        failure: &StageFailure,
        payload: &str,
    ) {
        record.status = MessageStatus::Failed;
        record.processed_at = Utc::now();
        record.error_details = Some(format!("{}: {}", failure.reason, failure.detail));

        let envelope = DeadLetterEnvelope::new(failure.reason, &failure.detail, payload);
        let dead_lettered = self
            .retry_fixed("dead-letter", || async {
                self.queue
                    .send(&self.queues.dead_letter, &envelope.to_json())
                    .await
            })
            .await;
        if let Err(err) = dead_lettered {
            error!(
                message_id = %record.id,
                error = %err,
                "dead-letter write failed; the stored record still carries the error"
            );
        }

        let saved = self
            .retry_fixed("persist-failed", || async {
                self.repository.save(record).await
            })
            .await;
        if let Err(err) = saved {
            error!(message_id = %record.id, error = %err, "failed-record persist failed");
        }
    }

    /// Bounded attempts with a fixed delay in between; no exponential
    /// back-off inside a single message
    async fn retry_fixed<T, E, F, Fut>(&self, operation: &str, mut run: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        let attempts = self.settings.retry_attempts.max(1);
        let delay = Duration::from_secs(self.settings.retry_delay_seconds);
        let mut attempt = 1;
        loop {
            match run().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < attempts => {
                    debug!(
                        operation,
                        attempt,
                        error = %err,
                        "stage attempt failed, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingSettings;
    use crate::queue::InMemoryQueue;
    use crate::repository::{InMemoryRepository, MessageFilter};
    use crate::validation::KeywordScreener;

    fn test_pipeline() -> (Pipeline, Arc<InMemoryQueue>, Arc<InMemoryRepository>) {
        let queue = Arc::new(InMemoryQueue::new());
        let repository = Arc::new(InMemoryRepository::new());
        let metrics = Arc::new(ProcessingMetrics::new());
        let state = Arc::new(ProcessorState::new(false));
        let compliance =
            ComplianceValidator::new(Arc::new(KeywordScreener::new(["BLOCKED"])));
        let pipeline = Pipeline::new(
            queue.clone(),
            repository.clone(),
            compliance,
            metrics,
            state,
            QueueNames::default(),
            ProcessingSettings {
                retry_attempts: 1,
                retry_delay_seconds: 0,
                ..Default::default()
            },
        );
        (pipeline, queue, repository)
    }

    fn wire_payload(block4: &str) -> String {
        format!(
            "{{1:F01BANKDEFFAXXX0123456789}}{{2:I103BANKBEBBAXXXN}}{{4:\n{}\n-}}",
            block4
        )
    }

    fn recent_date() -> String {
        Utc::now().date_naive().format("%y%m%d").to_string()
    }

    #[tokio::test]
    async fn test_happy_path_persists_and_forwards() {
        let (pipeline, queue, repository) = test_pipeline();
        let payload = wire_payload(&format!(
            ":20:REF1\n:23B:CRED\n:32A:{}EUR1000,00\n:50K:/12345678\nALICE\n1 MAIN ST\n:59:/87654321\nBOB\n2 OAK AVE\n:71A:SHA",
            recent_date()
        ));
        pipeline.process_message(&payload).await;

        // Raw payload forwarded unaltered
        let forwarded = queue.receive("completed").await.unwrap().unwrap();
        assert_eq!(forwarded, payload);
        assert!(queue.is_empty("deadLetter"));

        let stored = repository
            .query(&MessageFilter::default(), 0, 10)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, MessageStatus::Processed);
        assert_eq!(stored[0].metadata["transactionReference"], json!("REF1"));
        assert_eq!(stored[0].metadata["currency"], json!("EUR"));
        assert!(stored[0].parsed_message.is_some());

        let snapshot = pipeline.metrics.snapshot();
        assert_eq!(snapshot.total_processed, 1);
        assert_eq!(snapshot.total_failed, 0);
    }

    #[tokio::test]
    async fn test_parse_failure_routes_to_dlq() {
        let (pipeline, queue, repository) = test_pipeline();
        // Block 4 never terminated
        let payload = "{1:F01BANKDEFFAXXX0123456789}{2:I103BANKBEBBAXXXN}{4:\n:20:REF1\n";
        pipeline.process_message(payload).await;

        assert!(queue.is_empty("completed"));
        let envelope_json = queue.receive("deadLetter").await.unwrap().unwrap();
        let envelope = DeadLetterEnvelope::from_json(&envelope_json).unwrap();
        assert!(envelope.error_reason.contains("Parsing"));
        assert_eq!(envelope.original_message, payload);

        let stored = repository
            .query(&MessageFilter::default(), 0, 10)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, MessageStatus::Failed);
        assert!(stored[0].error_details.as_ref().unwrap().contains("Parsing"));

        let snapshot = pipeline.metrics.snapshot();
        assert_eq!(snapshot.errors_by_type["ParsingError"], 1);
    }

    #[tokio::test]
    async fn test_validation_failure_mentions_amount() {
        let (pipeline, queue, repository) = test_pipeline();
        let payload = wire_payload(&format!(
            ":20:REF1\n:23B:CRED\n:32A:{}EUR-50,00\n:50K:/12345678\nALICE\n1 MAIN ST\n:59:/87654321\nBOB\n2 OAK AVE\n:71A:SHA",
            recent_date()
        ));
        pipeline.process_message(&payload).await;

        assert!(queue.is_empty("completed"));
        assert_eq!(queue.len("deadLetter"), 1);

        let stored = repository
            .query(&MessageFilter::default(), 0, 10)
            .await
            .unwrap();
        assert!(stored[0]
            .error_details
            .as_ref()
            .unwrap()
            .contains("amount"));
        let snapshot = pipeline.metrics.snapshot();
        assert_eq!(snapshot.errors_by_type["ValidationError"], 1);
    }

    #[tokio::test]
    async fn test_compliance_critical_amount_routes_to_dlq() {
        let (pipeline, queue, _repository) = test_pipeline();
        let payload = wire_payload(&format!(
            ":20:REF1\n:23B:CRED\n:32A:{}USD20000000,00\n:50K:/12345678\nALICE\n1 MAIN ST\n:59:/87654321\nBOB\n2 OAK AVE\n:71A:SHA",
            recent_date()
        ));
        pipeline.process_message(&payload).await;

        assert!(queue.is_empty("completed"));
        assert_eq!(queue.len("deadLetter"), 1);
        let snapshot = pipeline.metrics.snapshot();
        assert_eq!(snapshot.errors_by_type["ValidationError"], 1);
    }

    #[tokio::test]
    async fn test_database_failure_routes_to_dlq() {
        let (pipeline, queue, repository) = test_pipeline();
        // Exhaust both the repository's internal backoff (none in the
        // in-memory backend) and the pipeline's single attempt
        repository.inject_transient_failures(1);
        let payload = wire_payload(&format!(
            ":20:REF1\n:23B:CRED\n:32A:{}EUR1000,00\n:50K:/12345678\nALICE\n1 MAIN ST\n:59:/87654321\nBOB\n2 OAK AVE\n:71A:SHA",
            recent_date()
        ));
        pipeline.process_message(&payload).await;

        assert!(queue.is_empty("completed"));
        assert_eq!(queue.len("deadLetter"), 1);
        let snapshot = pipeline.metrics.snapshot();
        assert_eq!(snapshot.errors_by_type["DatabaseError"], 1);

        // The Failed record still landed once the injected failure cleared
        let stored = repository
            .query(&MessageFilter::default(), 0, 10)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, MessageStatus::Failed);
    }
}
