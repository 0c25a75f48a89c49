use super::swift_utils::split_account_prefix;
use crate::errors::{DecodingError, ParseError};
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// **Field 52A: Ordering Institution**
///
/// Financial institution of the ordering customer.
///
/// **Format:** `[/1!a][/34x]` + BIC
///
/// **Example:**
/// ```text
/// :52A:DEUTDEFF
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field52A {
    /// Optional party identifier line (leading `/` stripped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_identifier: Option<String>,
    /// BIC code, kept verbatim
    pub bic: String,
}

impl SwiftField for Field52A {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = input.lines().collect();
        let (party_identifier, skip) = split_account_prefix(&lines);

        let bic = lines
            .get(skip)
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                DecodingError::invalid_field_format("Field 52A", "missing BIC line")
            })?;

        Ok(Field52A {
            party_identifier,
            bic,
        })
    }

    fn to_swift_string(&self) -> String {
        match &self.party_identifier {
            Some(id) => format!(":52A:/{}\n{}", id, self.bic),
            None => format!(":52A:{}", self.bic),
        }
    }
}
