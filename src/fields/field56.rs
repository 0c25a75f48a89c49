//! # Field 56: Intermediary Institution
//!
//! Institution between the sender's correspondent and the account-with
//! institution.
//!
//! **Options:**
//! - **56A:** optional party identifier + BIC
//! - **56C:** `/account` on a single line
//! - **56D:** optional `/account` + name and address lines

use super::swift_utils::split_account_prefix;
use crate::errors::{DecodingError, ParseError};
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// **Field 56A: Intermediary Institution (BIC)**
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field56A {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_identifier: Option<String>,
    pub bic: String,
}

impl SwiftField for Field56A {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = input.lines().collect();
        let (party_identifier, skip) = split_account_prefix(&lines);
        let bic = lines
            .get(skip)
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                DecodingError::invalid_field_format("Field 56A", "missing BIC line")
            })?;
        Ok(Field56A {
            party_identifier,
            bic,
        })
    }

    fn to_swift_string(&self) -> String {
        match &self.party_identifier {
            Some(id) => format!(":56A:/{}\n{}", id, self.bic),
            None => format!(":56A:{}", self.bic),
        }
    }
}

/// **Field 56C: Intermediary Institution (Account)**
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field56C {
    pub account: String,
}

impl SwiftField for Field56C {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let trimmed = input.trim();
        let account = trimmed.strip_prefix('/').unwrap_or(trimmed);
        if account.is_empty() {
            return Err(
                DecodingError::invalid_field_format("Field 56C", "missing account").into(),
            );
        }
        Ok(Field56C {
            account: account.to_string(),
        })
    }

    fn to_swift_string(&self) -> String {
        format!(":56C:/{}", self.account)
    }
}

/// **Field 56D: Intermediary Institution (Name and Address)**
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field56D {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_identifier: Option<String>,
    pub name_and_address: Vec<String>,
}

impl SwiftField for Field56D {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = input.lines().collect();
        let (party_identifier, skip) = split_account_prefix(&lines);
        let name_and_address: Vec<String> =
            lines[skip..].iter().map(|l| l.to_string()).collect();
        if name_and_address.is_empty() {
            return Err(DecodingError::invalid_field_format(
                "Field 56D",
                "must carry name and address lines",
            )
            .into());
        }
        Ok(Field56D {
            party_identifier,
            name_and_address,
        })
    }

    fn to_swift_string(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref id) = self.party_identifier {
            lines.push(format!("/{}", id));
        }
        lines.extend(self.name_and_address.iter().cloned());
        format!(":56D:{}", lines.join("\n"))
    }
}

/// **Field 56: Intermediary Institution** (options A, C, D)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field56 {
    #[serde(rename = "56A")]
    A(Field56A),
    #[serde(rename = "56C")]
    C(Field56C),
    #[serde(rename = "56D")]
    D(Field56D),
}

impl Field56 {
    pub fn bic(&self) -> Option<&str> {
        match self {
            Field56::A(field) => Some(&field.bic),
            _ => None,
        }
    }
}

impl SwiftField for Field56 {
    fn parse(input: &str) -> Result<Self, ParseError> {
        Ok(Field56::A(Field56A::parse(input)?))
    }

    fn parse_with_option(value: &str, option: Option<&str>) -> Result<Self, ParseError> {
        match option {
            Some("A") => Ok(Field56::A(Field56A::parse(value)?)),
            Some("C") => Ok(Field56::C(Field56C::parse(value)?)),
            Some("D") => Ok(Field56::D(Field56D::parse(value)?)),
            other => Err(DecodingError::UnsupportedOption {
                tag: "56".to_string(),
                option: other.unwrap_or("(none)").to_string(),
            }
            .into()),
        }
    }

    fn to_swift_string(&self) -> String {
        match self {
            Field56::A(field) => field.to_swift_string(),
            Field56::C(field) => field.to_swift_string(),
            Field56::D(field) => field.to_swift_string(),
        }
    }

    fn option_letter(&self) -> Option<&'static str> {
        match self {
            Field56::A(_) => Some("A"),
            Field56::C(_) => Some("C"),
            Field56::D(_) => Some("D"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field56_options() {
        let field = Field56::parse_with_option("IRVTUS3N", Some("A")).unwrap();
        assert_eq!(field.bic(), Some("IRVTUS3N"));

        let field = Field56::parse_with_option("/12345", Some("C")).unwrap();
        assert_eq!(field.to_swift_string(), ":56C:/12345");

        let field =
            Field56::parse_with_option("FIRST BANK\n10 WALL ST", Some("D")).unwrap();
        assert_eq!(field.bic(), None);
        assert_eq!(field.to_swift_string(), ":56D:FIRST BANK\n10 WALL ST");

        assert!(Field56::parse_with_option("IRVTUS3N", Some("B")).is_err());
    }

    #[test]
    fn test_field56c_empty() {
        assert!(Field56C::parse("/").is_err());
    }
}
