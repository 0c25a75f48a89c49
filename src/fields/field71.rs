//! # Field 71: Charges
//!
//! - **71A:** which party bears the charges (BEN/OUR/SHA)
//! - **71F:** sender's charges, currency + amount
//! - **71G:** receiver's charges, currency + amount

use super::swift_utils::{format_swift_amount, parse_exact_length, split_currency_amount};
use crate::errors::{DecodingError, ParseError};
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// Valid charge-bearer codes for field 71A
pub const CHARGE_BEARER_CODES: &[&str] = &["BEN", "OUR", "SHA"];

/// **Field 71A: Details of Charges**
///
/// **Format:** `3!a`, one of `BEN`, `OUR`, `SHA`
///
/// **Example:**
/// ```text
/// :71A:SHA
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field71A {
    /// Charge bearer code
    pub code: String,
}

impl SwiftField for Field71A {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let code = parse_exact_length(input.trim(), 3, "Field 71A code")?.to_uppercase();
        if !CHARGE_BEARER_CODES.contains(&code.as_str()) {
            return Err(DecodingError::invalid_field_format(
                "Field 71A",
                format!("code must be one of {:?}, found {}", CHARGE_BEARER_CODES, code),
            )
            .into());
        }
        Ok(Field71A { code })
    }

    fn to_swift_string(&self) -> String {
        format!(":71A:{}", self.code)
    }
}

/// **Field 71F: Sender's Charges**
///
/// **Format:** `3!a15d`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field71F {
    pub currency: String,
    pub amount: f64,
}

impl SwiftField for Field71F {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let (currency, amount) = split_currency_amount(input, "Field 71F")?;
        Ok(Field71F { currency, amount })
    }

    fn to_swift_string(&self) -> String {
        format!(":71F:{}{}", self.currency, format_swift_amount(self.amount))
    }
}

/// **Field 71G: Receiver's Charges**
///
/// **Format:** `3!a15d`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field71G {
    pub currency: String,
    pub amount: f64,
}

impl SwiftField for Field71G {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let (currency, amount) = split_currency_amount(input, "Field 71G")?;
        Ok(Field71G { currency, amount })
    }

    fn to_swift_string(&self) -> String {
        format!(":71G:{}{}", self.currency, format_swift_amount(self.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field71a() {
        for code in ["BEN", "OUR", "SHA"] {
            let field = Field71A::parse(code).unwrap();
            assert_eq!(field.code, code);
        }
        assert!(Field71A::parse("XXX").is_err());
        assert!(Field71A::parse("BE").is_err());
        assert_eq!(Field71A::parse("sha").unwrap().code, "SHA");
    }

    #[test]
    fn test_field71f() {
        let field = Field71F::parse("USD25,00").unwrap();
        assert_eq!(field.currency, "USD");
        assert_eq!(field.amount, 25.0);
        assert_eq!(field.to_swift_string(), ":71F:USD25,00");
        assert!(Field71F::parse("USD").is_err());
    }

    #[test]
    fn test_field71g() {
        let field = Field71G::parse("EUR10,50").unwrap();
        assert_eq!(field.currency, "EUR");
        assert_eq!(field.amount, 10.5);
        assert_eq!(field.to_swift_string(), ":71G:EUR10,50");
    }
}
