use crate::errors::ParseError;
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// **Field 20: Sender's Reference**
///
/// Transaction reference assigned by the sender to identify the message.
///
/// **Format:** `16x`
///
/// The value is trimmed and kept verbatim; the reference grammar and length
/// window are enforced by the syntactic validator so violations surface as
/// validation failures.
///
/// **Example:**
/// ```text
/// :20:PAYMENT123456
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field20 {
    /// Sender's reference
    pub reference: String,
}

impl SwiftField for Field20 {
    fn parse(input: &str) -> Result<Self, ParseError> {
        Ok(Field20 {
            reference: input.trim().to_string(),
        })
    }

    fn to_swift_string(&self) -> String {
        format!(":20:{}", self.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field20_parse() {
        let field = Field20::parse("PAYMENT123456").unwrap();
        assert_eq!(field.reference, "PAYMENT123456");

        let field = Field20::parse("  REF1  ").unwrap();
        assert_eq!(field.reference, "REF1");
    }

    #[test]
    fn test_field20_lenient_length() {
        // Over-long references decode; the validator rejects them
        let field = Field20::parse("1234567890ABCDEFG").unwrap();
        assert_eq!(field.reference.len(), 17);
    }

    #[test]
    fn test_field20_to_swift_string() {
        let field = Field20 {
            reference: "PAYMENT123456".to_string(),
        };
        assert_eq!(field.to_swift_string(), ":20:PAYMENT123456");
    }
}
