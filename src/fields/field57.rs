//! # Field 57: Account With Institution
//!
//! Institution servicing the beneficiary's account.
//!
//! **Options:**
//! - **57A:** optional party identifier + BIC
//! - **57B:** optional `/account` line and/or location line
//! - **57C:** `/account` on a single line
//! - **57D:** optional `/account` + name and address lines

use super::field53::Field53B;
use super::field56::{Field56A, Field56C, Field56D};
use crate::errors::{DecodingError, ParseError};
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// **Field 57: Account With Institution** (options A, B, C, D)
///
/// Component layouts match fields 53B and 56A/C/D; only the tag differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field57 {
    #[serde(rename = "57A")]
    A(Field56A),
    #[serde(rename = "57B")]
    B(Field53B),
    #[serde(rename = "57C")]
    C(Field56C),
    #[serde(rename = "57D")]
    D(Field56D),
}

impl Field57 {
    pub fn bic(&self) -> Option<&str> {
        match self {
            Field57::A(field) => Some(&field.bic),
            _ => None,
        }
    }
}

impl SwiftField for Field57 {
    fn parse(input: &str) -> Result<Self, ParseError> {
        Ok(Field57::A(Field56A::parse(input)?))
    }

    fn parse_with_option(value: &str, option: Option<&str>) -> Result<Self, ParseError> {
        match option {
            Some("A") => Ok(Field57::A(Field56A::parse(value)?)),
            Some("B") => Ok(Field57::B(Field53B::parse(value)?)),
            Some("C") => Ok(Field57::C(Field56C::parse(value)?)),
            Some("D") => Ok(Field57::D(Field56D::parse(value)?)),
            other => Err(DecodingError::UnsupportedOption {
                tag: "57".to_string(),
                option: other.unwrap_or("(none)").to_string(),
            }
            .into()),
        }
    }

    fn to_swift_string(&self) -> String {
        match self {
            Field57::A(field) => field.to_swift_string().replacen(":56A:", ":57A:", 1),
            Field57::B(field) => field.to_swift_string().replacen(":53B:", ":57B:", 1),
            Field57::C(field) => field.to_swift_string().replacen(":56C:", ":57C:", 1),
            Field57::D(field) => field.to_swift_string().replacen(":56D:", ":57D:", 1),
        }
    }

    fn option_letter(&self) -> Option<&'static str> {
        match self {
            Field57::A(_) => Some("A"),
            Field57::B(_) => Some("B"),
            Field57::C(_) => Some("C"),
            Field57::D(_) => Some("D"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field57_options() {
        let field = Field57::parse_with_option("BARCGB22", Some("A")).unwrap();
        assert_eq!(field.bic(), Some("BARCGB22"));
        assert_eq!(field.to_swift_string(), ":57A:BARCGB22");

        let field = Field57::parse_with_option("/987654", Some("B")).unwrap();
        assert_eq!(field.to_swift_string(), ":57B:/987654");

        let field = Field57::parse_with_option("/987654", Some("C")).unwrap();
        assert_eq!(field.to_swift_string(), ":57C:/987654");

        let field = Field57::parse_with_option("BANK\n1 SQUARE", Some("D")).unwrap();
        assert_eq!(field.to_swift_string(), ":57D:BANK\n1 SQUARE");

        assert!(Field57::parse_with_option("BARCGB22", Some("E")).is_err());
    }
}
