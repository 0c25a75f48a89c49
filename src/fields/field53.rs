//! # Field 53: Sender's Correspondent
//!
//! Account or institution through which the sender reimburses the receiver.
//!
//! **Options:**
//! - **53A:** optional party identifier + BIC
//! - **53B:** optional `/account` line and/or location line

use super::swift_utils::split_account_prefix;
use crate::errors::{DecodingError, ParseError};
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// **Field 53A: Sender's Correspondent (BIC)**
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field53A {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_identifier: Option<String>,
    pub bic: String,
}

impl SwiftField for Field53A {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = input.lines().collect();
        let (party_identifier, skip) = split_account_prefix(&lines);
        let bic = lines
            .get(skip)
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                DecodingError::invalid_field_format("Field 53A", "missing BIC line")
            })?;
        Ok(Field53A {
            party_identifier,
            bic,
        })
    }

    fn to_swift_string(&self) -> String {
        match &self.party_identifier {
            Some(id) => format!(":53A:/{}\n{}", id, self.bic),
            None => format!(":53A:{}", self.bic),
        }
    }
}

/// **Field 53B: Sender's Correspondent (Account/Location)**
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field53B {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl SwiftField for Field53B {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = input.lines().collect();
        let (account, skip) = split_account_prefix(&lines);
        let location = lines
            .get(skip)
            .map(|l| l.to_string())
            .filter(|l| !l.is_empty());

        if account.is_none() && location.is_none() {
            return Err(DecodingError::invalid_field_format(
                "Field 53B",
                "must carry an account or a location",
            )
            .into());
        }

        Ok(Field53B { account, location })
    }

    fn to_swift_string(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref account) = self.account {
            lines.push(format!("/{}", account));
        }
        if let Some(ref location) = self.location {
            lines.push(location.clone());
        }
        format!(":53B:{}", lines.join("\n"))
    }
}

/// **Field 53: Sender's Correspondent** (options A and B)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field53 {
    #[serde(rename = "53A")]
    A(Field53A),
    #[serde(rename = "53B")]
    B(Field53B),
}

impl Field53 {
    pub fn bic(&self) -> Option<&str> {
        match self {
            Field53::A(field) => Some(&field.bic),
            Field53::B(_) => None,
        }
    }
}

impl SwiftField for Field53 {
    fn parse(input: &str) -> Result<Self, ParseError> {
        Ok(Field53::A(Field53A::parse(input)?))
    }

    fn parse_with_option(value: &str, option: Option<&str>) -> Result<Self, ParseError> {
        match option {
            Some("A") => Ok(Field53::A(Field53A::parse(value)?)),
            Some("B") => Ok(Field53::B(Field53B::parse(value)?)),
            other => Err(DecodingError::UnsupportedOption {
                tag: "53".to_string(),
                option: other.unwrap_or("(none)").to_string(),
            }
            .into()),
        }
    }

    fn to_swift_string(&self) -> String {
        match self {
            Field53::A(field) => field.to_swift_string(),
            Field53::B(field) => field.to_swift_string(),
        }
    }

    fn option_letter(&self) -> Option<&'static str> {
        match self {
            Field53::A(_) => Some("A"),
            Field53::B(_) => Some("B"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field53a() {
        let field = Field53A::parse("CHASUS33").unwrap();
        assert_eq!(field.bic, "CHASUS33");
    }

    #[test]
    fn test_field53b_account() {
        let field = Field53B::parse("/98765432").unwrap();
        assert_eq!(field.account.as_deref(), Some("98765432"));
        assert_eq!(field.location, None);
    }

    #[test]
    fn test_field53b_empty() {
        assert!(Field53B::parse("").is_err());
    }

    #[test]
    fn test_field53_option_dispatch() {
        let field = Field53::parse_with_option("CHASUS33", Some("A")).unwrap();
        assert_eq!(field.bic(), Some("CHASUS33"));

        let field = Field53::parse_with_option("/98765432", Some("B")).unwrap();
        assert_eq!(field.bic(), None);

        assert!(Field53::parse_with_option("CHASUS33", Some("D")).is_err());
    }
}
