//! Customer party model shared by fields 50 and 59
//!
//! The variant is fixed at decode time: an option-A field carries a BIC,
//! a no-option/K field carries name and address lines.

use serde::{Deserialize, Serialize};

/// Ordering or beneficiary customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Party {
    /// Identified by BIC, optionally with an account and name lines
    WithBic {
        #[serde(skip_serializing_if = "Option::is_none")]
        account: Option<String>,
        bic: String,
        name: Vec<String>,
    },
    /// Identified by name and address lines, optionally with an account
    NameAddress {
        #[serde(skip_serializing_if = "Option::is_none")]
        account: Option<String>,
        name: Vec<String>,
        address: Vec<String>,
    },
}

impl Party {
    pub fn account(&self) -> Option<&str> {
        match self {
            Party::WithBic { account, .. } | Party::NameAddress { account, .. } => {
                account.as_deref()
            }
        }
    }

    pub fn name_lines(&self) -> &[String] {
        match self {
            Party::WithBic { name, .. } | Party::NameAddress { name, .. } => name,
        }
    }

    pub fn address_lines(&self) -> &[String] {
        match self {
            Party::WithBic { .. } => &[],
            Party::NameAddress { address, .. } => address,
        }
    }

    pub fn bic(&self) -> Option<&str> {
        match self {
            Party::WithBic { bic, .. } => Some(bic),
            Party::NameAddress { .. } => None,
        }
    }

    /// Joined name, as screened by the sanctions hook
    pub fn display_name(&self) -> String {
        self.name_lines().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_accessors() {
        let party = Party::NameAddress {
            account: Some("12345678".to_string()),
            name: vec!["ALICE".to_string()],
            address: vec!["1 MAIN ST".to_string()],
        };
        assert_eq!(party.account(), Some("12345678"));
        assert_eq!(party.display_name(), "ALICE");
        assert_eq!(party.bic(), None);
        assert_eq!(party.address_lines().len(), 1);

        let party = Party::WithBic {
            account: None,
            bic: "DEUTDEFF".to_string(),
            name: vec![],
        };
        assert_eq!(party.bic(), Some("DEUTDEFF"));
        assert!(party.address_lines().is_empty());
    }
}
