//! SWIFT header blocks (Block 1 and Block 2)
//!
//! Headers are carried for diagnostics and message-type detection only; the
//! processing pipeline never takes routing decisions from them. Parsing is
//! positional, mirroring the fixed layout of the FIN headers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{FramingError, Result};

/// Basic Header (Block 1)
///
/// Layout: `F 01 BANKDEFFAXXX 0123 456789`
/// (application id, service id, logical terminal, session, sequence)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicHeader {
    pub application_id: String,
    pub service_id: String,
    pub logical_terminal: String,
    pub session_number: String,
    pub sequence_number: String,
}

impl BasicHeader {
    pub fn parse(content: &str) -> Result<Self> {
        if !content.is_ascii() || content.len() < 21 {
            return Err(FramingError::MalformedTagLine {
                line: 1,
                content: format!("malformed basic header: {content}"),
            }
            .into());
        }
        Ok(BasicHeader {
            application_id: content[0..1].to_string(),
            service_id: content[1..3].to_string(),
            logical_terminal: content[3..15].to_string(),
            session_number: content[15..19].to_string(),
            sequence_number: content[19..].to_string(),
        })
    }
}

impl fmt::Display for BasicHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.application_id,
            self.service_id,
            self.logical_terminal,
            self.session_number,
            self.sequence_number
        )
    }
}

/// Application Header (Block 2)
///
/// Only the fields the processor needs are decoded: direction, message
/// type, destination address and priority. The remainder is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationHeader {
    /// I = input (to SWIFT), O = output (from SWIFT)
    pub direction: String,
    /// 3-digit message type, e.g. "103"
    pub message_type: String,
    pub destination_address: String,
    pub priority: String,
    /// Unparsed trailing content, if any
    pub remainder: String,
}

impl ApplicationHeader {
    pub fn parse(content: &str) -> Result<Self> {
        if !content.is_ascii() || content.len() < 4 {
            return Err(FramingError::MalformedTagLine {
                line: 1,
                content: format!("malformed application header: {content}"),
            }
            .into());
        }
        let direction = content[0..1].to_string();
        let message_type = content[1..4].to_string();
        let rest = &content[4..];
        let (destination_address, priority, remainder) = if rest.len() >= 13 {
            (
                rest[0..12].to_string(),
                rest[12..13].to_string(),
                rest[13..].to_string(),
            )
        } else {
            (rest.to_string(), String::new(), String::new())
        };
        Ok(ApplicationHeader {
            direction,
            message_type,
            destination_address,
            priority,
            remainder,
        })
    }
}

impl fmt::Display for ApplicationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.direction,
            self.message_type,
            self.destination_address,
            self.priority,
            self.remainder
        )
    }
}
