//! Dead-letter envelope
//!
//! Structured text written to the dead-letter queue when a message fails
//! any pipeline stage. Carries the original payload verbatim so operators
//! can replay it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope written to the dead-letter queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetterEnvelope {
    /// Stage-level reason, e.g. "Parsing failed"
    pub error_reason: String,
    /// Detailed error text
    pub error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_stack_trace: Option<String>,
    /// ISO-8601 UTC
    pub failed_at: DateTime<Utc>,
    /// Raw payload exactly as consumed from the input queue
    pub original_message: String,
}

impl DeadLetterEnvelope {
    pub fn new(error_reason: &str, error_message: &str, original_message: &str) -> Self {
        Self {
            error_reason: error_reason.to_string(),
            error_message: error_message.to_string(),
            error_stack_trace: None,
            failed_at: Utc::now(),
            original_message: original_message.to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        // A struct of strings and a timestamp cannot fail to serialize
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
