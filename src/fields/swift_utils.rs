//! # Core SWIFT Utility Functions
//!
//! Low-level parsing utilities for SWIFT MT primitive data types: dates,
//! amounts, currency and BIC shapes, and character-set checks.
//!
//! Decoders stay structural; semantic rules (ISO 4217 membership, BIC
//! format, length budgets, amount limits) belong to the syntactic
//! validator so they surface as validation failures rather than parse
//! failures.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::DecodingError;

/// BIC format: 4 bank chars, 2 country chars, 2 location, optional 3 branch
pub static BIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{4}[A-Z]{2}[A-Z0-9]{2}([A-Z0-9]{3})?$").expect("invalid BIC regex"));

/// Transaction reference grammar (field 20), applied after uppercasing
pub static REFERENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9/\-?:().,'+\s]{1,16}$").expect("invalid reference regex"));

/// SWIFT amount: digits with an optional comma decimal separator.
/// The leading sign is tolerated here so sign violations surface from the
/// validator, not the parser.
static AMOUNT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,15}(,\d*)?$").expect("invalid amount regex"));

/// Parse a string with exact length requirement
pub fn parse_exact_length(
    input: &str,
    expected_len: usize,
    field_name: &str,
) -> Result<String, DecodingError> {
    if input.len() != expected_len {
        return Err(DecodingError::invalid_field_format(
            field_name,
            format!(
                "must be exactly {} characters, found {}",
                expected_len,
                input.len()
            ),
        ));
    }
    Ok(input.to_string())
}

/// Parse a string with maximum length limit
pub fn parse_max_length(
    input: &str,
    max_len: usize,
    field_name: &str,
) -> Result<String, DecodingError> {
    if input.len() > max_len {
        return Err(DecodingError::invalid_field_format(
            field_name,
            format!("must be at most {} characters, found {}", max_len, input.len()),
        ));
    }
    Ok(input.to_string())
}

/// Check the SWIFT X character set: printable ASCII, plus newline for
/// multi-line values
pub fn is_swift_charset(input: &str) -> bool {
    input
        .chars()
        .all(|c| c == '\n' || (' '..='~').contains(&c))
}

/// Check whether a BIC matches the 8/11-character SWIFT shape
pub fn is_valid_bic(input: &str) -> bool {
    BIC_REGEX.is_match(input)
}

/// Parse date in YYMMDD format
///
/// The two-digit year maps onto [2000..2099]; the century window is pinned
/// rather than inherited from any platform default.
pub fn parse_date_yymmdd(input: &str) -> Result<NaiveDate, DecodingError> {
    if input.len() != 6 || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(DecodingError::DateParseError {
            message: format!("date must be 6 digits (YYMMDD), found '{}'", input),
        });
    }

    let year = 2000
        + input[0..2].parse::<i32>().map_err(|_| DecodingError::DateParseError {
            message: "invalid year in date".to_string(),
        })?;
    let month = input[2..4]
        .parse::<u32>()
        .map_err(|_| DecodingError::DateParseError {
            message: "invalid month in date".to_string(),
        })?;
    let day = input[4..6]
        .parse::<u32>()
        .map_err(|_| DecodingError::DateParseError {
            message: "invalid day in date".to_string(),
        })?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DecodingError::DateParseError {
        message: format!("invalid calendar date: {}-{:02}-{:02}", year, month, day),
    })
}

/// Parse a SWIFT amount with the canonical comma decimal separator
///
/// Only `,` is accepted as separator; a period or thousand separators are
/// rejected. Sign and magnitude limits are the validator's concern.
pub fn parse_swift_amount(input: &str) -> Result<f64, DecodingError> {
    if !AMOUNT_REGEX.is_match(input) {
        return Err(DecodingError::AmountParseError {
            message: format!(
                "amount '{}' must be digits with an optional ',' decimal separator",
                input
            ),
        });
    }
    input
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| DecodingError::AmountParseError {
            message: format!("invalid amount '{}': {}", input, e),
        })
}

/// Whether the amount carries more than `max_digits` fraction digits
///
/// Decided through correctly-rounded decimal formatting rather than
/// scaling arithmetic: near the 15-significant-digit end of the range the
/// binary representation error exceeds any fixed epsilon, while one extra
/// formatted digit stays exact.
pub fn fraction_digits_exceed(amount: f64, max_digits: usize) -> bool {
    let formatted = format!("{:.*}", max_digits + 1, amount.abs());
    !formatted.ends_with('0')
}

/// Format an amount for SWIFT output: comma separator, two fraction digits
pub fn format_swift_amount(amount: f64) -> String {
    format!("{:.2}", amount).replace('.', ",")
}

/// Split a currency+amount composite: 3 currency chars, then the amount
pub fn split_currency_amount(
    input: &str,
    field_name: &str,
) -> Result<(String, f64), DecodingError> {
    if !input.is_ascii() {
        return Err(DecodingError::invalid_field_format(
            field_name,
            "contains non-ASCII characters",
        ));
    }
    if input.len() < 4 {
        return Err(DecodingError::invalid_field_format(
            field_name,
            format!("must be at least 4 characters, found {}", input.len()),
        ));
    }
    let currency = input[0..3].to_string();
    let amount = parse_swift_amount(&input[3..])?;
    Ok((currency, amount))
}

/// Split `[/account]` + remaining lines, the common party-field prefix
pub fn split_account_prefix(lines: &[&str]) -> (Option<String>, usize) {
    match lines.first() {
        Some(first) if first.starts_with('/') && first.len() > 1 => {
            (Some(first[1..].to_string()), 1)
        }
        _ => (None, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_yymmdd_century_window() {
        let date = parse_date_yymmdd("241215").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 12, 15).unwrap());

        // High two-digit years stay in the 21st century
        let date = parse_date_yymmdd("990101").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2099, 1, 1).unwrap());

        let date = parse_date_yymmdd("000229").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2000, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date_yymmdd("24121").is_err());
        assert!(parse_date_yymmdd("241315").is_err());
        assert!(parse_date_yymmdd("2412AB").is_err());
    }

    #[test]
    fn test_parse_swift_amount() {
        assert_eq!(parse_swift_amount("1000,00").unwrap(), 1000.0);
        assert_eq!(parse_swift_amount("1234567,89").unwrap(), 1234567.89);
        assert_eq!(parse_swift_amount("500").unwrap(), 500.0);
        assert_eq!(parse_swift_amount("0,5").unwrap(), 0.5);
        // Sign is tolerated at parse time; the validator rejects it
        assert_eq!(parse_swift_amount("-50,00").unwrap(), -50.0);
    }

    #[test]
    fn test_parse_swift_amount_rejects_period_and_thousands() {
        assert!(parse_swift_amount("1000.00").is_err());
        assert!(parse_swift_amount("1,000,00").is_err());
        assert!(parse_swift_amount("").is_err());
        assert!(parse_swift_amount("EUR100").is_err());
    }

    #[test]
    fn test_fraction_digits() {
        assert!(!fraction_digits_exceed(1000.00, 2));
        assert!(!fraction_digits_exceed(0.01, 2));
        assert!(fraction_digits_exceed(100.999, 2));
        assert!(fraction_digits_exceed(1000.001, 2));
        // Boundary amount keeps exactly two digits despite float noise
        assert!(!fraction_digits_exceed(999_999_999_999.99, 2));
    }

    #[test]
    fn test_format_swift_amount() {
        assert_eq!(format_swift_amount(1000.0), "1000,00");
        assert_eq!(format_swift_amount(1234567.89), "1234567,89");
        assert_eq!(format_swift_amount(0.5), "0,50");
    }

    #[test]
    fn test_bic_shapes() {
        assert!(is_valid_bic("DEUTDEFF"));
        assert!(is_valid_bic("DEUTDEFF500"));
        assert!(!is_valid_bic("DEUTDEF"));
        assert!(!is_valid_bic("DEUTDEFF5000"));
        assert!(!is_valid_bic("12UTDEFF"));
    }

    #[test]
    fn test_swift_charset() {
        assert!(is_swift_charset("ACME CORP / INV-2024 (NET 30)"));
        assert!(is_swift_charset("LINE1\nLINE2"));
        assert!(!is_swift_charset("CAFÉ"));
        assert!(!is_swift_charset("TAB\tTAB"));
    }

    #[test]
    fn test_split_currency_amount() {
        let (currency, amount) = split_currency_amount("EUR1000,00", "32A").unwrap();
        assert_eq!(currency, "EUR");
        assert_eq!(amount, 1000.0);
        assert!(split_currency_amount("EU", "32A").is_err());
    }

    #[test]
    fn test_split_account_prefix() {
        let lines = vec!["/12345678", "ALICE"];
        let (account, skip) = split_account_prefix(&lines);
        assert_eq!(account.as_deref(), Some("12345678"));
        assert_eq!(skip, 1);

        let lines = vec!["ALICE", "1 MAIN ST"];
        let (account, skip) = split_account_prefix(&lines);
        assert_eq!(account, None);
        assert_eq!(skip, 0);
    }
}
