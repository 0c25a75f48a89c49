//! # Field 59: Beneficiary Customer
//!
//! Party to be credited by the transfer.
//!
//! **Options:**
//! - **59A:** optional `/account` line, BIC line, remaining lines = name
//! - **59 (no option):** optional `/account` line, name line, address lines

use super::party::Party;
use super::swift_utils::split_account_prefix;
use crate::errors::{DecodingError, ParseError};
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// **Field 59A: Beneficiary Customer (BIC)**
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field59A {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    pub bic: String,
    pub name: Vec<String>,
}

impl SwiftField for Field59A {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = input.lines().collect();
        let (account, skip) = split_account_prefix(&lines);

        let bic = lines
            .get(skip)
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                DecodingError::invalid_field_format("Field 59A", "missing BIC line")
            })?;

        let name = lines[skip + 1..].iter().map(|l| l.to_string()).collect();

        Ok(Field59A { account, bic, name })
    }

    fn to_swift_string(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref account) = self.account {
            lines.push(format!("/{}", account));
        }
        lines.push(self.bic.clone());
        lines.extend(self.name.iter().cloned());
        format!(":59A:{}", lines.join("\n"))
    }
}

/// **Field 59 (No Option): Beneficiary Customer (Name and Address)**
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field59NoOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    pub name: Vec<String>,
    pub address: Vec<String>,
}

impl SwiftField for Field59NoOption {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = input.lines().collect();
        let (account, skip) = split_account_prefix(&lines);

        let rest: Vec<String> = lines[skip..].iter().map(|l| l.to_string()).collect();
        if rest.is_empty() {
            return Err(DecodingError::invalid_field_format(
                "Field 59",
                "must carry at least a name line",
            )
            .into());
        }

        Ok(Field59NoOption {
            account,
            name: vec![rest[0].clone()],
            address: rest[1..].to_vec(),
        })
    }

    fn to_swift_string(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref account) = self.account {
            lines.push(format!("/{}", account));
        }
        lines.extend(self.name.iter().cloned());
        lines.extend(self.address.iter().cloned());
        format!(":59:{}", lines.join("\n"))
    }
}

/// **Field 59: Beneficiary Customer** (option A or none)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field59 {
    #[serde(rename = "59A")]
    A(Field59A),
    #[serde(rename = "59")]
    NoOption(Field59NoOption),
}

impl Field59 {
    pub fn to_party(&self) -> Party {
        match self {
            Field59::A(field) => Party::WithBic {
                account: field.account.clone(),
                bic: field.bic.clone(),
                name: field.name.clone(),
            },
            Field59::NoOption(field) => Party::NameAddress {
                account: field.account.clone(),
                name: field.name.clone(),
                address: field.address.clone(),
            },
        }
    }
}

impl SwiftField for Field59 {
    fn parse(input: &str) -> Result<Self, ParseError> {
        Ok(Field59::NoOption(Field59NoOption::parse(input)?))
    }

    fn parse_with_option(value: &str, option: Option<&str>) -> Result<Self, ParseError> {
        match option {
            None => Ok(Field59::NoOption(Field59NoOption::parse(value)?)),
            Some("A") => Ok(Field59::A(Field59A::parse(value)?)),
            Some(other) => Err(DecodingError::UnsupportedOption {
                tag: "59".to_string(),
                option: other.to_string(),
            }
            .into()),
        }
    }

    fn to_swift_string(&self) -> String {
        match self {
            Field59::A(field) => field.to_swift_string(),
            Field59::NoOption(field) => field.to_swift_string(),
        }
    }

    fn option_letter(&self) -> Option<&'static str> {
        match self {
            Field59::A(_) => Some("A"),
            Field59::NoOption(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field59a() {
        let field = Field59A::parse("/GB82WEST12345698765432\nMIDLGB22").unwrap();
        assert_eq!(field.account.as_deref(), Some("GB82WEST12345698765432"));
        assert_eq!(field.bic, "MIDLGB22");

        let field = Field59A::parse("CHASUS33XXX").unwrap();
        assert_eq!(field.account, None);
        assert_eq!(field.bic, "CHASUS33XXX");
    }

    #[test]
    fn test_field59_no_option() {
        let field = Field59NoOption::parse("/87654321\nBOB\n2 OAK AVE").unwrap();
        assert_eq!(field.account.as_deref(), Some("87654321"));
        assert_eq!(field.name, vec!["BOB"]);
        assert_eq!(field.address, vec!["2 OAK AVE"]);
    }

    #[test]
    fn test_field59_option_dispatch() {
        let field = Field59::parse_with_option("/1\nBOB\n2 OAK AVE", None).unwrap();
        assert_eq!(field.option_letter(), None);

        let field = Field59::parse_with_option("CHASUS33", Some("A")).unwrap();
        assert_eq!(field.option_letter(), Some("A"));

        assert!(Field59::parse_with_option("BOB", Some("F")).is_err());
    }

    #[test]
    fn test_field59_to_party() {
        let field = Field59::parse_with_option("/87654321\nBOB\n2 OAK AVE", None).unwrap();
        let party = field.to_party();
        assert_eq!(party.account(), Some("87654321"));
        assert_eq!(party.display_name(), "BOB");
        assert_eq!(party.address_lines(), ["2 OAK AVE"]);
    }

    #[test]
    fn test_field59_round_trip() {
        let input = "/87654321\nBOB\n2 OAK AVE";
        let field = Field59::parse_with_option(input, None).unwrap();
        assert_eq!(field.to_swift_string(), format!(":59:{}", input));
    }
}
