//! # Message Parser
//!
//! Entry point for complete message parsing: framing (C1 blocks), header
//! decoding, and message-type dispatch into the typed decoders.

use crate::errors::{DecodingError, Result};
use crate::headers::{ApplicationHeader, BasicHeader};
use crate::messages::MT103;
use crate::parsed_message::ParsedSwiftMessage;
use crate::swift_message::SwiftMessage;
use crate::tokenizer;
use crate::traits::SwiftMessageBody;

/// Main entry point for SWIFT message parsing
pub struct SwiftParser;

impl SwiftParser {
    /// Parse a raw payload into a specific message type
    ///
    /// Block 2 is not consulted; callers that need type detection use
    /// [`parse_auto`](Self::parse_auto).
    pub fn parse<T: SwiftMessageBody>(raw: &str) -> Result<SwiftMessage<T>> {
        let (blocks, entries) = tokenizer::frame(raw)?;
        let fields = T::from_entries(&entries)?;
        Ok(SwiftMessage {
            basic_header: blocks
                .block_1
                .as_deref()
                .and_then(|b| BasicHeader::parse(b).ok()),
            application_header: blocks
                .block_2
                .as_deref()
                .and_then(|b| ApplicationHeader::parse(b).ok()),
            message_type: T::message_type().to_string(),
            fields,
        })
    }

    /// Detect the message type from the application header (block 2)
    pub fn detect_message_type(raw: &str) -> Result<String> {
        let blocks = tokenizer::extract_blocks(raw)?;
        let block2 = blocks
            .block_2
            .as_deref()
            .ok_or(DecodingError::MissingApplicationHeader)?;
        let header = ApplicationHeader::parse(block2)?;
        Ok(header.message_type)
    }

    /// Parse a raw payload, dispatching on the message type in block 2
    pub fn parse_auto(raw: &str) -> Result<ParsedSwiftMessage> {
        let message_type = Self::detect_message_type(raw)?;
        match message_type.as_str() {
            "103" => Ok(ParsedSwiftMessage::MT103(Box::new(Self::parse::<MT103>(
                raw,
            )?))),
            other => Err(DecodingError::UnsupportedMessageType {
                message_type: other.to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FramingError, ParseError};

    const RAW: &str = "{1:F01BANKDEFFAXXX0123456789}{2:I103BANKBEBBAXXXN}{4:\n:20:REF1\n:23B:CRED\n:32A:241215EUR1000,00\n:50K:/12345678\nALICE\n1 MAIN ST\n:59:/87654321\nBOB\n2 OAK AVE\n:71A:SHA\n-}";

    #[test]
    fn test_parse_auto_mt103() {
        let parsed = SwiftParser::parse_auto(RAW).unwrap();
        assert_eq!(parsed.message_type(), "103");
        assert_eq!(parsed.transaction_reference(), "REF1");
        assert_eq!(parsed.currency(), "EUR");
        assert_eq!(parsed.amount(), 1000.0);
    }

    #[test]
    fn test_parse_auto_unsupported_type() {
        let raw = RAW.replace("{2:I103", "{2:I202");
        let err = SwiftParser::parse_auto(&raw).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Decoding(DecodingError::UnsupportedMessageType { .. })
        ));
    }

    #[test]
    fn test_parse_auto_missing_block2() {
        let raw = "{1:F01BANKDEFFAXXX0123456789}{4:\n:20:REF1\n-}";
        let err = SwiftParser::parse_auto(raw).unwrap_err();
        assert_eq!(
            err,
            DecodingError::MissingApplicationHeader.into()
        );
    }

    #[test]
    fn test_parse_missing_trailer() {
        let raw = RAW.trim_end_matches("\n-}");
        let err = SwiftParser::parse_auto(raw).unwrap_err();
        assert_eq!(err, FramingError::UnterminatedBlock4.into());
    }

    #[test]
    fn test_wire_round_trip() {
        let parsed = SwiftParser::parse_auto(RAW).unwrap();
        let rendered = parsed.to_mt_message();
        let reparsed = SwiftParser::parse_auto(&rendered).unwrap();
        assert_eq!(parsed, reparsed);
    }
}
