//! Processor configuration
//!
//! One JSON document read at start-up, with serde-supplied defaults for
//! every setting. Validation applies the documented ranges; a violation is
//! fatal at start-up.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ConfigError;
use crate::queue::QueueNames;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "SWIFT_PROCESSOR_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// "memory" today; the repository seam admits external providers
    pub provider: String,
    pub connection_string: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            provider: "memory".to_string(),
            connection_string: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueProvider {
    InMemory,
    HttpBroker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueSettings {
    pub provider: QueueProvider,
    /// Required when the provider is HttpBroker
    pub broker_url: Option<String>,
    pub input_queue: String,
    pub completed_queue: String,
    pub dead_letter_queue: String,
    /// Long-poll window for broker receives
    pub receive_wait_seconds: u64,
    /// Visibility interval the broker applies to received messages
    pub visibility_timeout_seconds: u64,
}

impl Default for QueueSettings {
    fn default() -> Self {
        let names = QueueNames::default();
        Self {
            provider: QueueProvider::InMemory,
            broker_url: None,
            input_queue: names.input,
            completed_queue: names.completed,
            dead_letter_queue: names.dead_letter,
            receive_wait_seconds: 10,
            visibility_timeout_seconds: 30,
        }
    }
}

impl QueueSettings {
    pub fn queue_names(&self) -> QueueNames {
        QueueNames {
            input: self.input_queue.clone(),
            completed: self.completed_queue.clone(),
            dead_letter: self.dead_letter_queue.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingSettings {
    pub max_concurrent_messages: u32,
    pub message_processing_timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
    pub queue_polling_interval_milliseconds: u64,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            max_concurrent_messages: 1,
            message_processing_timeout_seconds: 60,
            retry_attempts: 3,
            retry_delay_seconds: 5,
            queue_polling_interval_milliseconds: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommunicationSettings {
    pub communication_directory: String,
    pub status_update_interval_seconds: u64,
    pub command_timeout_seconds: u64,
}

impl Default for CommunicationSettings {
    fn default() -> Self {
        Self {
            communication_directory: "./comm".to_string(),
            status_update_interval_seconds: 5,
            command_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestModeSettings {
    pub enabled: bool,
    pub generation_interval_seconds: u64,
    /// 0..=100; share of generated messages that are valid
    pub valid_message_percentage: u8,
    pub batch_size: u32,
}

impl Default for TestModeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            generation_interval_seconds: 10,
            valid_message_percentage: 80,
            batch_size: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SanctionsSettings {
    /// Keyword set for the default substring screener
    pub keywords: Vec<String>,
}

/// Root configuration document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub queue: QueueSettings,
    pub processing: ProcessingSettings,
    pub communication: CommunicationSettings,
    pub test_mode: TestModeSettings,
    pub sanctions: SanctionsSettings,
}

impl AppConfig {
    /// Read and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Unreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config from `SWIFT_PROCESSOR_CONFIG` or an explicit
    /// path argument; defaults apply when neither names a file
    pub fn resolve(arg: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = arg {
            return Self::load(Path::new(path));
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load(Path::new(&path));
        }
        let config = AppConfig::default();
        config.validate()?;
        Ok(config)
    }

    /// Apply the documented setting constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.provider == QueueProvider::HttpBroker
            && self
                .queue
                .broker_url
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
        {
            return Err(ConfigError::MissingSetting {
                setting: "queue.brokerUrl".to_string(),
            });
        }
        for (setting, name) in [
            (&self.queue.input_queue, "queue.inputQueue"),
            (&self.queue.completed_queue, "queue.completedQueue"),
            (&self.queue.dead_letter_queue, "queue.deadLetterQueue"),
        ] {
            if setting.trim().is_empty() {
                return Err(ConfigError::MissingSetting {
                    setting: name.to_string(),
                });
            }
        }
        if self.processing.max_concurrent_messages == 0 {
            return Err(ConfigError::invalid_value(
                "processing.maxConcurrentMessages",
                "must be at least 1",
            ));
        }
        if self.processing.retry_attempts == 0 {
            return Err(ConfigError::invalid_value(
                "processing.retryAttempts",
                "must be at least 1",
            ));
        }
        if self.processing.message_processing_timeout_seconds == 0 {
            return Err(ConfigError::invalid_value(
                "processing.messageProcessingTimeoutSeconds",
                "must be at least 1",
            ));
        }
        if self.processing.queue_polling_interval_milliseconds == 0 {
            return Err(ConfigError::invalid_value(
                "processing.queuePollingIntervalMilliseconds",
                "must be at least 1",
            ));
        }
        if self.communication.communication_directory.trim().is_empty() {
            return Err(ConfigError::MissingSetting {
                setting: "communication.communicationDirectory".to_string(),
            });
        }
        if self.communication.status_update_interval_seconds == 0 {
            return Err(ConfigError::invalid_value(
                "communication.statusUpdateIntervalSeconds",
                "must be at least 1",
            ));
        }
        if self.test_mode.valid_message_percentage > 100 {
            return Err(ConfigError::invalid_value(
                "testMode.validMessagePercentage",
                "must be between 0 and 100",
            ));
        }
        if self.test_mode.batch_size == 0 {
            return Err(ConfigError::invalid_value(
                "testMode.batchSize",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
