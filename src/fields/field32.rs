//! # Field 32A: Value Date, Currency, Amount
//!
//! Settlement amount and value date for the credit transfer.
//!
//! **Format:** `6!n3!a15d` (YYMMDD + currency + amount)
//!
//! **Example:**
//! ```text
//! :32A:241215EUR1000,00
//! ```

use super::swift_utils::{format_swift_amount, parse_date_yymmdd, parse_swift_amount};
use crate::errors::{DecodingError, ParseError};
use crate::traits::SwiftField;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// **Field 32A: Value Date, Currency, Amount**
///
/// The currency is taken positionally and verbatim; ISO 4217 membership,
/// amount sign and magnitude are validator concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field32A {
    /// Value date (YYMMDD, pinned to the 2000–2099 window)
    #[serde(with = "date_string")]
    pub value_date: NaiveDate,
    /// ISO 4217 currency code
    pub currency: String,
    /// Settlement amount
    pub amount: f64,
}

impl SwiftField for Field32A {
    fn parse(input: &str) -> Result<Self, ParseError> {
        if !input.is_ascii() {
            return Err(DecodingError::invalid_field_format(
                "Field 32A",
                "contains non-ASCII characters",
            )
            .into());
        }
        // 6 digits date + 3 chars currency + at least 1 amount digit
        if input.len() < 10 {
            return Err(DecodingError::invalid_field_format(
                "Field 32A",
                format!("must be at least 10 characters, found {}", input.len()),
            )
            .into());
        }

        let value_date = parse_date_yymmdd(&input[0..6])?;
        let currency = input[6..9].to_string();
        let amount = parse_swift_amount(&input[9..])?;

        Ok(Field32A {
            value_date,
            currency,
            amount,
        })
    }

    fn to_swift_string(&self) -> String {
        format!(
            ":32A:{}{}{}",
            self.value_date.format("%y%m%d"),
            self.currency,
            format_swift_amount(self.amount)
        )
    }
}

// Dates serialize as ISO strings in stored records
mod date_string {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(serde::de::Error::custom)
    }
}
