use crate::errors::{DecodingError, ParseError};
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// **Field 72: Sender to Receiver Information**
///
/// Instructions for the receiving institution, typically `/CODE/` prefixed.
///
/// **Format:** `6*35x`
///
/// Lines are preserved as received; the 6×35 budget is enforced by the
/// syntactic validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field72 {
    /// Information lines
    pub information: Vec<String>,
}

impl SwiftField for Field72 {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let information: Vec<String> = input.lines().map(|l| l.to_string()).collect();
        if information.is_empty() {
            return Err(
                DecodingError::invalid_field_format("Field 72", "must not be empty").into(),
            );
        }
        Ok(Field72 { information })
    }

    fn to_swift_string(&self) -> String {
        format!(":72:{}", self.information.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field72_parse() {
        let field = Field72::parse("/INS/CHASUS33\n/ACC/SETTLEMENT").unwrap();
        assert_eq!(field.information.len(), 2);
        assert_eq!(
            field.to_swift_string(),
            ":72:/INS/CHASUS33\n/ACC/SETTLEMENT"
        );
    }

    #[test]
    fn test_field72_empty() {
        assert!(Field72::parse("").is_err());
    }
}
