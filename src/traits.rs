//! # Core Traits
//!
//! Fundamental traits for SWIFT message parsing and serialization.
//!
//! - **SwiftField**: Field-level parsing and serialization
//! - **SwiftMessageBody**: Message-level operations

use crate::errors::Result;
use crate::tokenizer::FieldEntry;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for SWIFT field types
///
/// Implemented by all field types for parsing and serialization.
/// Enum fields (Field50, Field59) support variant-based parsing.
pub trait SwiftField: Serialize + for<'de> Deserialize<'de> + Clone + Debug {
    /// Parse field from SWIFT format (without `:TAG:` prefix)
    fn parse(value: &str) -> Result<Self>
    where
        Self: Sized;

    /// Parse field with option letter (e.g., 50A, 50K) for enum fields
    fn parse_with_option(value: &str, _option: Option<&str>) -> Result<Self>
    where
        Self: Sized,
    {
        Self::parse(value)
    }

    /// Convert to SWIFT format (includes `:TAG:` prefix)
    fn to_swift_string(&self) -> String;

    /// Get option letter ("A", "K") for enum fields, None for simple fields
    fn option_letter(&self) -> Option<&'static str> {
        None
    }
}

/// Trait for SWIFT message types (MT103 today; new MT types implement this
/// and register a `ParsedSwiftMessage` variant without touching existing code)
pub trait SwiftMessageBody: Debug + Clone + Send + Sync + Serialize {
    /// Message type identifier (e.g., "103")
    fn message_type() -> &'static str;

    /// Build the typed message from framed block-4 entries
    fn from_entries(entries: &[FieldEntry]) -> Result<Self>
    where
        Self: Sized;

    /// Convert to SWIFT MT format (Block 4 content, no wrapper braces)
    fn to_mt_string(&self) -> String;
}
