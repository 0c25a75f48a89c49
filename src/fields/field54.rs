//! # Field 54: Receiver's Correspondent
//!
//! Branch or correspondent at which the receiver will claim the funds.
//! Same component layout as field 53.

use super::field53::{Field53A, Field53B};
use crate::errors::{DecodingError, ParseError};
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// **Field 54: Receiver's Correspondent** (options A and B)
///
/// Reuses the field 53 component structs; only the rendered tag differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field54 {
    #[serde(rename = "54A")]
    A(Field53A),
    #[serde(rename = "54B")]
    B(Field53B),
}

impl Field54 {
    pub fn bic(&self) -> Option<&str> {
        match self {
            Field54::A(field) => Some(&field.bic),
            Field54::B(_) => None,
        }
    }
}

impl SwiftField for Field54 {
    fn parse(input: &str) -> Result<Self, ParseError> {
        Ok(Field54::A(Field53A::parse(input)?))
    }

    fn parse_with_option(value: &str, option: Option<&str>) -> Result<Self, ParseError> {
        match option {
            Some("A") => Ok(Field54::A(Field53A::parse(value)?)),
            Some("B") => Ok(Field54::B(Field53B::parse(value)?)),
            other => Err(DecodingError::UnsupportedOption {
                tag: "54".to_string(),
                option: other.unwrap_or("(none)").to_string(),
            }
            .into()),
        }
    }

    fn to_swift_string(&self) -> String {
        // Re-tag the field 53 rendering
        match self {
            Field54::A(field) => field.to_swift_string().replacen(":53A:", ":54A:", 1),
            Field54::B(field) => field.to_swift_string().replacen(":53B:", ":54B:", 1),
        }
    }

    fn option_letter(&self) -> Option<&'static str> {
        match self {
            Field54::A(_) => Some("A"),
            Field54::B(_) => Some("B"),
        }
    }
}
