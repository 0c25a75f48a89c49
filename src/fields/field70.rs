use crate::errors::{DecodingError, ParseError};
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// **Field 70: Remittance Information**
///
/// Payment details passed to the beneficiary.
///
/// **Format:** `4*35x`
///
/// Lines are preserved as received; the 4×35 budget is enforced by the
/// syntactic validator.
///
/// **Example:**
/// ```text
/// :70:INVOICE 12345
/// Q2 CONSULTING
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field70 {
    /// Remittance lines
    pub information: Vec<String>,
}

impl SwiftField for Field70 {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let information: Vec<String> = input.lines().map(|l| l.to_string()).collect();
        if information.is_empty() {
            return Err(
                DecodingError::invalid_field_format("Field 70", "must not be empty").into(),
            );
        }
        Ok(Field70 { information })
    }

    fn to_swift_string(&self) -> String {
        format!(":70:{}", self.information.join("\n"))
    }
}
