use super::swift_utils::{format_swift_amount, split_currency_amount};
use crate::errors::ParseError;
use crate::traits::SwiftField;
use serde::{Deserialize, Serialize};

/// **Field 33B: Currency/Original Ordered Amount**
///
/// Original currency and amount as instructed, before any conversion.
///
/// **Format:** `3!a15d`
///
/// **Example:**
/// ```text
/// :33B:USD1250,00
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field33B {
    /// ISO 4217 currency code
    pub currency: String,
    /// Original ordered amount
    pub amount: f64,
}

impl SwiftField for Field33B {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let (currency, amount) = split_currency_amount(input, "Field 33B")?;
        Ok(Field33B { currency, amount })
    }

    fn to_swift_string(&self) -> String {
        format!(":33B:{}{}", self.currency, format_swift_amount(self.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field33b_parse() {
        let field = Field33B::parse("USD1250,00").unwrap();
        assert_eq!(field.currency, "USD");
        assert_eq!(field.amount, 1250.0);
    }

    #[test]
    fn test_field33b_too_short() {
        assert!(Field33B::parse("USD").is_err());
    }

    #[test]
    fn test_field33b_to_swift_string() {
        let field = Field33B {
            currency: "USD".to_string(),
            amount: 1250.0,
        };
        assert_eq!(field.to_swift_string(), ":33B:USD1250,00");
    }
}
