use super::swift_utils::parse_exact_length;
use crate::errors::ParseError;
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// Codes the network accepts for field 23B
pub const BANK_OPERATION_CODES: &[&str] = &["CRED", "CRTS", "SPAY", "SPRI", "SSTD"];

/// **Field 23B: Bank Operation Code**
///
/// **Format:** `4!c`
///
/// Decoding uppercases and requires exactly 4 characters; membership in
/// [`BANK_OPERATION_CODES`] is checked by the syntactic validator.
///
/// **Example:**
/// ```text
/// :23B:CRED
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field23B {
    /// Bank operation code, uppercased
    pub code: String,
}

impl Field23B {
    pub fn is_known_code(&self) -> bool {
        BANK_OPERATION_CODES.contains(&self.code.as_str())
    }
}

impl SwiftField for Field23B {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let code = parse_exact_length(input.trim(), 4, "Field 23B code")?;
        Ok(Field23B {
            code: code.to_uppercase(),
        })
    }

    fn to_swift_string(&self) -> String {
        format!(":23B:{}", self.code)
    }
}
