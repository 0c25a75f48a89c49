//! # ParsedSwiftMessage
//!
//! Enum over the supported SWIFT message types, used by
//! `SwiftParser::parse_auto`. Dispatch by message-type string is a lookup;
//! adding a type adds a variant and leaves existing decoders untouched.

use serde::{Deserialize, Serialize};

use crate::messages::MT103;
use crate::swift_message::SwiftMessage;

/// A parsed message of any supported type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mt_type")]
pub enum ParsedSwiftMessage {
    #[serde(rename = "103")]
    MT103(Box<SwiftMessage<MT103>>),
}

impl ParsedSwiftMessage {
    /// Get the message type as a string
    pub fn message_type(&self) -> &'static str {
        match self {
            ParsedSwiftMessage::MT103(_) => "103",
        }
    }

    pub fn as_mt103(&self) -> Option<&SwiftMessage<MT103>> {
        match self {
            ParsedSwiftMessage::MT103(msg) => Some(msg),
        }
    }

    /// Transaction reference of the underlying message
    pub fn transaction_reference(&self) -> &str {
        match self {
            ParsedSwiftMessage::MT103(msg) => msg.fields.transaction_reference(),
        }
    }

    /// Settlement amount of the underlying message
    pub fn amount(&self) -> f64 {
        match self {
            ParsedSwiftMessage::MT103(msg) => msg.fields.amount(),
        }
    }

    /// Settlement currency of the underlying message
    pub fn currency(&self) -> &str {
        match self {
            ParsedSwiftMessage::MT103(msg) => msg.fields.currency(),
        }
    }

    /// Render back to wire form
    pub fn to_mt_message(&self) -> String {
        match self {
            ParsedSwiftMessage::MT103(msg) => msg.to_mt_message(),
        }
    }
}
