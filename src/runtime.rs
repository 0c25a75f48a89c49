//! Composition root
//!
//! Wires queue backend, repository, validators, pipeline, IPC plane and
//! generator from the configuration, then runs the four long-lived tasks
//! under one cancellation token: processing loop, status publisher,
//! command poller, and the synthetic generator.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{AppConfig, QueueProvider};
use crate::errors::ConfigError;
use crate::generator::TestMessageGenerator;
use crate::ipc::{self, ProcessCommand, ProcessStatus};
use crate::pipeline::{Pipeline, ProcessingMetrics};
use crate::queue::{HttpBrokerQueue, InMemoryQueue, MessageQueue, QueueNames};
use crate::repository::{InMemoryRepository, MessageRepository, RetryingRepository};
use crate::state::{ProcessorState, STATUS_RESTARTING};
use crate::validation::{ComplianceValidator, KeywordScreener};

/// Poll step while waiting for the in-flight message during Restart
const RESTART_POLL: Duration = Duration::from_millis(100);

/// A fully wired processor instance
pub struct Runtime {
    config: AppConfig,
    queue: Arc<dyn MessageQueue>,
    repository: Arc<dyn MessageRepository>,
    metrics: Arc<ProcessingMetrics>,
    state: Arc<ProcessorState>,
    queues: QueueNames,
}

impl Runtime {
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let queue: Arc<dyn MessageQueue> = match config.queue.provider {
            QueueProvider::InMemory => Arc::new(InMemoryQueue::new()),
            QueueProvider::HttpBroker => {
                let url = config.queue.broker_url.as_deref().unwrap_or_default();
                let broker = HttpBrokerQueue::new(
                    url,
                    Duration::from_secs(config.queue.receive_wait_seconds),
                    Duration::from_secs(config.queue.visibility_timeout_seconds),
                )
                .map_err(|e| ConfigError::invalid_value("queue.brokerUrl", e.to_string()))?;
                Arc::new(broker)
            }
        };

        let repository: Arc<dyn MessageRepository> = match config.database.provider.as_str() {
            "memory" => Arc::new(RetryingRepository::new(Arc::new(
                InMemoryRepository::new(),
            ))),
            other => {
                return Err(ConfigError::invalid_value(
                    "database.provider",
                    format!("unknown provider '{other}'"),
                ));
            }
        };

        let queues = config.queue.queue_names();
        let state = Arc::new(ProcessorState::new(config.test_mode.enabled));

        Ok(Self {
            config,
            queue,
            repository,
            metrics: Arc::new(ProcessingMetrics::new()),
            state,
            queues,
        })
    }

    pub fn queue(&self) -> Arc<dyn MessageQueue> {
        Arc::clone(&self.queue)
    }

    pub fn repository(&self) -> Arc<dyn MessageRepository> {
        Arc::clone(&self.repository)
    }

    pub fn state(&self) -> Arc<ProcessorState> {
        Arc::clone(&self.state)
    }

    pub fn metrics(&self) -> Arc<ProcessingMetrics> {
        Arc::clone(&self.metrics)
    }

    fn comm_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.communication.communication_directory)
    }

    fn build_pipeline(&self) -> Pipeline {
        let screener = Arc::new(KeywordScreener::new(
            self.config.sanctions.keywords.iter().cloned(),
        ));
        Pipeline::new(
            Arc::clone(&self.queue),
            Arc::clone(&self.repository),
            ComplianceValidator::new(screener),
            Arc::clone(&self.metrics),
            Arc::clone(&self.state),
            self.queues.clone(),
            self.config.processing.clone(),
        )
    }

    /// Build the current status document
    pub async fn current_status(&self) -> ProcessStatus {
        let snapshot = self.metrics.snapshot();
        let pending = match self.queue.stats(&self.queues.input).await {
            Ok(stats) => stats.messages_in_queue,
            Err(_) => 0,
        };
        let mut metadata = std::collections::BTreeMap::new();
        metadata.insert(
            "averageProcessingTimeMs".to_string(),
            serde_json::json!(snapshot.average_processing_time_ms),
        );
        metadata.insert(
            "messagesPerMinute".to_string(),
            serde_json::json!(snapshot.messages_per_minute),
        );
        ProcessStatus {
            is_running: self.state.is_running(),
            is_processing: self.state.is_processing(),
            messages_processed: snapshot.total_processed,
            messages_failed: snapshot.total_failed,
            messages_pending: pending,
            last_processed_at: self.state.last_processed_at(),
            status_updated_at: Utc::now(),
            status: self.state.status_label(),
            test_mode_enabled: self.state.test_mode_enabled(),
            metadata,
        }
    }

    async fn publish_status(&self) {
        let status = self.current_status().await;
        if let Err(err) = ipc::write_status(&self.comm_dir(), &status).await {
            // Retried on the next tick
            warn!(error = %err, "status publication failed");
        }
    }

    async fn status_loop(&self, shutdown: CancellationToken) {
        let interval =
            Duration::from_secs(self.config.communication.status_update_interval_seconds);
        self.publish_status().await;
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
            self.publish_status().await;
        }
        // Final publication so the control front observes the stop
        self.publish_status().await;
    }

    async fn command_loop(&self, shutdown: CancellationToken) {
        let interval =
            Duration::from_secs(self.config.communication.status_update_interval_seconds);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
            match ipc::poll_command(&self.comm_dir()).await {
                Ok(Some(command)) => self.apply_command(command).await,
                Ok(None) => {}
                Err(err) => warn!(error = %err, "command poll failed"),
            }
        }
    }

    /// Apply one lifecycle command
    pub async fn apply_command(&self, command: ProcessCommand) {
        info!(?command, "applying command");
        match command {
            ProcessCommand::Start => self.state.start(),
            ProcessCommand::Stop => self.state.stop(),
            ProcessCommand::Restart => self.restart().await,
            ProcessCommand::GetStatus => self.publish_status().await,
            ProcessCommand::EnableTestMode => self.state.set_test_mode(true),
            ProcessCommand::DisableTestMode => self.state.set_test_mode(false),
            ProcessCommand::Reset => self.metrics.reset(),
        }
    }

    /// Stop consumption, let the in-flight message finish, resume.
    /// Counters persist across the restart; only Reset zeroes them.
    async fn restart(&self) {
        self.state.stop();
        self.state.set_label(STATUS_RESTARTING);

        let timeout =
            Duration::from_secs(self.config.communication.command_timeout_seconds.max(1));
        let waited = tokio::time::timeout(timeout, async {
            while self.state.is_processing() {
                tokio::time::sleep(RESTART_POLL).await;
            }
        })
        .await;
        if waited.is_err() {
            warn!("in-flight message did not finish within the command timeout");
        }

        self.publish_status().await;
        self.state.start();
    }

    /// Run all tasks until the shutdown token fires
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) -> io::Result<()> {
        tokio::fs::create_dir_all(self.comm_dir()).await?;
        info!(
            comm_dir = %self.comm_dir().display(),
            test_mode = self.config.test_mode.enabled,
            "processor starting"
        );

        let pipeline = Arc::new(self.build_pipeline());

        let mut tasks = Vec::new();
        {
            let pipeline = Arc::clone(&pipeline);
            let token = shutdown.clone();
            tasks.push(tokio::spawn(async move { pipeline.run(token).await }));
        }
        {
            let runtime = Arc::clone(&self);
            let token = shutdown.clone();
            tasks.push(tokio::spawn(async move { runtime.status_loop(token).await }));
        }
        {
            let runtime = Arc::clone(&self);
            let token = shutdown.clone();
            tasks.push(tokio::spawn(
                async move { runtime.command_loop(token).await },
            ));
        }
        {
            let generator = TestMessageGenerator::new(
                Arc::clone(&self.queue),
                self.queues.input.clone(),
                Arc::clone(&self.state),
                self.config.test_mode.clone(),
            );
            let token = shutdown.clone();
            tasks.push(tokio::spawn(async move { generator.run(token).await }));
        }

        for task in tasks {
            if let Err(err) = task.await {
                error!(error = %err, "task terminated abnormally");
                return Err(io::Error::other(err));
            }
        }
        info!("processor stopped");
        Ok(())
    }
}
