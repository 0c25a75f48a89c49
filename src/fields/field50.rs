//! # Field 50: Ordering Customer
//!
//! Identifies the originator of the payment instruction.
//!
//! **Options:**
//! - **50A:** optional `/account` line, BIC line, remaining lines = name
//! - **50K:** optional `/account` line, name line, up to address lines
//!
//! Line counts and BIC shape are validator concerns; decoding only fixes
//! the party variant and slices the components.

use super::party::Party;
use super::swift_utils::split_account_prefix;
use crate::errors::{DecodingError, ParseError};
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// **Field 50A: Ordering Customer (BIC)**
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field50A {
    /// Optional account identifier (leading `/` stripped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// BIC code, kept verbatim
    pub bic: String,
    /// Optional name lines following the BIC
    pub name: Vec<String>,
}

impl SwiftField for Field50A {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = input.lines().collect();
        let (account, skip) = split_account_prefix(&lines);

        let bic = lines
            .get(skip)
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                DecodingError::invalid_field_format("Field 50A", "missing BIC line")
            })?;

        let name = lines[skip + 1..]
            .iter()
            .map(|l| l.to_string())
            .collect();

        Ok(Field50A { account, bic, name })
    }

    fn to_swift_string(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref account) = self.account {
            lines.push(format!("/{}", account));
        }
        lines.push(self.bic.clone());
        lines.extend(self.name.iter().cloned());
        format!(":50A:{}", lines.join("\n"))
    }
}

/// **Field 50K: Ordering Customer (Name and Address)**
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field50K {
    /// Optional account identifier (leading `/` stripped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Name lines (first non-account line)
    pub name: Vec<String>,
    /// Address lines (everything after the name)
    pub address: Vec<String>,
}

impl SwiftField for Field50K {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = input.lines().collect();
        let (account, skip) = split_account_prefix(&lines);

        let rest: Vec<String> = lines[skip..].iter().map(|l| l.to_string()).collect();
        if rest.is_empty() {
            return Err(DecodingError::invalid_field_format(
                "Field 50K",
                "must carry at least a name line",
            )
            .into());
        }

        let name = vec![rest[0].clone()];
        let address = rest[1..].to_vec();

        Ok(Field50K {
            account,
            name,
            address,
        })
    }

    fn to_swift_string(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref account) = self.account {
            lines.push(format!("/{}", account));
        }
        lines.extend(self.name.iter().cloned());
        lines.extend(self.address.iter().cloned());
        format!(":50K:{}", lines.join("\n"))
    }
}

/// **Field 50: Ordering Customer** (options A and K)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field50 {
    #[serde(rename = "50A")]
    A(Field50A),
    #[serde(rename = "50K")]
    K(Field50K),
}

impl Field50 {
    pub fn to_party(&self) -> Party {
        match self {
            Field50::A(field) => Party::WithBic {
                account: field.account.clone(),
                bic: field.bic.clone(),
                name: field.name.clone(),
            },
            Field50::K(field) => Party::NameAddress {
                account: field.account.clone(),
                name: field.name.clone(),
                address: field.address.clone(),
            },
        }
    }
}

impl SwiftField for Field50 {
    fn parse(input: &str) -> Result<Self, ParseError> {
        Ok(Field50::K(Field50K::parse(input)?))
    }

    fn parse_with_option(value: &str, option: Option<&str>) -> Result<Self, ParseError> {
        match option {
            Some("A") => Ok(Field50::A(Field50A::parse(value)?)),
            Some("K") => Ok(Field50::K(Field50K::parse(value)?)),
            other => Err(DecodingError::UnsupportedOption {
                tag: "50".to_string(),
                option: other.unwrap_or("(none)").to_string(),
            }
            .into()),
        }
    }

    fn to_swift_string(&self) -> String {
        match self {
            Field50::A(field) => field.to_swift_string(),
            Field50::K(field) => field.to_swift_string(),
        }
    }

    fn option_letter(&self) -> Option<&'static str> {
        match self {
            Field50::A(_) => Some("A"),
            Field50::K(_) => Some("K"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field50a_with_account() {
        let field = Field50A::parse("/12345678\nDEUTDEFF\nALICE GMBH").unwrap();
        assert_eq!(field.account.as_deref(), Some("12345678"));
        assert_eq!(field.bic, "DEUTDEFF");
        assert_eq!(field.name, vec!["ALICE GMBH"]);
    }

    #[test]
    fn test_field50a_without_account() {
        let field = Field50A::parse("DEUTDEFF500").unwrap();
        assert_eq!(field.account, None);
        assert_eq!(field.bic, "DEUTDEFF500");
        assert!(field.name.is_empty());
    }

    #[test]
    fn test_field50a_missing_bic() {
        assert!(Field50A::parse("/12345678").is_err());
        assert!(Field50A::parse("").is_err());
    }

    #[test]
    fn test_field50k_full() {
        let field = Field50K::parse("/12345678\nALICE\n1 MAIN ST\nSPRINGFIELD").unwrap();
        assert_eq!(field.account.as_deref(), Some("12345678"));
        assert_eq!(field.name, vec!["ALICE"]);
        assert_eq!(field.address, vec!["1 MAIN ST", "SPRINGFIELD"]);
    }

    #[test]
    fn test_field50k_name_only() {
        let field = Field50K::parse("ALICE").unwrap();
        assert_eq!(field.account, None);
        assert_eq!(field.name, vec!["ALICE"]);
        assert!(field.address.is_empty());
    }

    #[test]
    fn test_field50_option_dispatch() {
        let field = Field50::parse_with_option("/1\nDEUTDEFF\nX", Some("A")).unwrap();
        assert_eq!(field.option_letter(), Some("A"));

        let field = Field50::parse_with_option("ALICE\n1 MAIN ST", Some("K")).unwrap();
        assert_eq!(field.option_letter(), Some("K"));

        let err = Field50::parse_with_option("ALICE", Some("F")).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Decoding(DecodingError::UnsupportedOption { .. })
        ));
    }

    #[test]
    fn test_field50_to_party() {
        let field = Field50::K(Field50K {
            account: Some("12345678".to_string()),
            name: vec!["ALICE".to_string()],
            address: vec!["1 MAIN ST".to_string()],
        });
        let party = field.to_party();
        assert_eq!(party.account(), Some("12345678"));
        assert_eq!(party.display_name(), "ALICE");
    }

    #[test]
    fn test_field50_round_trip() {
        let input = "/12345678\nALICE\n1 MAIN ST";
        let field = Field50::parse_with_option(input, Some("K")).unwrap();
        assert_eq!(field.to_swift_string(), format!(":50K:{}", input));
    }
}
