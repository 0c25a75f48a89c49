//! Error types for SWIFT MT message parsing and processing
//!
//! Parse-stage errors are split into framing (block structure) and decoding
//! (field semantics) so callers can report which stage rejected a message.
//! Service-level errors carry a transient/permanent distinction where the
//! caller's retry policy depends on it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for parse-stage operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Block-structure errors raised while framing a raw SWIFT payload
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum FramingError {
    #[error("Missing block 4 (text block) in message")]
    MissingBlock4,

    #[error("Block 4 is not terminated by '-}}'")]
    UnterminatedBlock4,

    #[error("Malformed tag line at line {line}: {content}")]
    MalformedTagLine { line: usize, content: String },

    #[error("Unknown block number: {block_number}")]
    UnknownBlockNumber { block_number: String },

    #[error("Unmatched opening brace for block {block_number}")]
    UnmatchedBrace { block_number: String },

    #[error("No SWIFT blocks found in message")]
    NoBlocksFound,
}

/// Field-semantics errors raised while decoding framed entries into a typed message
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecodingError {
    #[error("Missing required field: {tag} for message type {message_type}")]
    MissingTag { tag: String, message_type: String },

    #[error("Unsupported option letter: {option} for field {tag}")]
    UnsupportedOption { tag: String, option: String },

    #[error("Unsupported message type: {message_type}")]
    UnsupportedMessageType { message_type: String },

    #[error("Missing application header (block 2); cannot determine message type")]
    MissingApplicationHeader,

    #[error("Invalid field format: {field} - {message}")]
    InvalidFieldFormat { field: String, message: String },

    #[error("Date parse error: {message}")]
    DateParseError { message: String },

    #[error("Amount parse error: {message}")]
    AmountParseError { message: String },
}

/// Main error type for the parse stage (framing + decoding)
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParseError {
    #[error(transparent)]
    Framing(#[from] FramingError),

    #[error(transparent)]
    Decoding(#[from] DecodingError),
}

impl ParseError {
    /// Stage label used in dead-letter reasons and log lines
    pub fn stage(&self) -> &'static str {
        match self {
            ParseError::Framing(_) => "framing",
            ParseError::Decoding(_) => "decoding",
        }
    }
}

impl DecodingError {
    pub fn missing_tag(tag: &str, message_type: &str) -> Self {
        DecodingError::MissingTag {
            tag: tag.to_string(),
            message_type: message_type.to_string(),
        }
    }

    pub fn invalid_field_format(field: &str, message: impl Into<String>) -> Self {
        DecodingError::InvalidFieldFormat {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Fatal start-up errors: missing or out-of-range configuration
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Missing required setting: {setting}")]
    MissingSetting { setting: String },

    #[error("Invalid value for {setting}: {message}")]
    InvalidValue { setting: String, message: String },

    #[error("Cannot read configuration from {path}: {message}")]
    Unreadable { path: String, message: String },
}

impl ConfigError {
    pub fn invalid_value(setting: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            setting: setting.to_string(),
            message: message.into(),
        }
    }
}

/// Queue backend errors
///
/// `Unhealthy` and `Transient` are back-off conditions for the pipeline,
/// never a reason to dead-letter the in-flight message.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueueError {
    #[error("Queue backend unhealthy: {message}")]
    Unhealthy { message: String },

    #[error("Transient queue error on {queue}: {message}")]
    Transient { queue: String, message: String },

    #[error("Queue backend error on {queue}: {message}")]
    Backend { queue: String, message: String },
}

impl QueueError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            QueueError::Unhealthy { .. } | QueueError::Transient { .. }
        )
    }
}

/// Repository errors; the transient subset is retried inside the repository layer
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum RepositoryError {
    #[error("Transient database error: {message}")]
    Transient { message: String },

    #[error("Record not found: {id}")]
    NotFound { id: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl RepositoryError {
    pub fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::Transient { .. })
    }
}

/// Status/command plane errors; logged and retried on the next tick
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum IpcError {
    #[error("IPC I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("IPC serialization error: {message}")]
    Serialization { message: String },
}

impl IpcError {
    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        IpcError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for IpcError {
    fn from(err: serde_json::Error) -> Self {
        IpcError::Serialization {
            message: err.to_string(),
        }
    }
}
