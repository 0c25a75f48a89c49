//! Syntactic validator
//!
//! Rule-by-rule checks over a decoded MT103. Violations are collected into
//! a single report so callers can surface every problem at once.

use chrono::{Duration, NaiveDate, Utc};

use super::currencies::is_known_currency;
use super::ValidationReport;
use crate::fields::swift_utils::{
    fraction_digits_exceed, is_swift_charset, is_valid_bic, REFERENCE_REGEX,
};
use crate::fields::Party;
use crate::messages::MT103;

/// Upper bound on settlement amounts
pub const MAX_AMOUNT: f64 = 999_999_999_999.99;

/// Acceptance window around today for the value date, in days
pub const VALUE_DATE_WINDOW_DAYS: i64 = 365;

/// Syntactic validator for MT103 messages
pub struct SyntacticValidator;

impl SyntacticValidator {
    /// Validate against today's date
    pub fn validate(message: &MT103) -> ValidationReport {
        Self::validate_as_of(message, Utc::now().date_naive())
    }

    /// Validate with an explicit reference date
    pub fn validate_as_of(message: &MT103, today: NaiveDate) -> ValidationReport {
        let mut report = ValidationReport::default();

        check_free_text(&mut report, message);
        check_reference(&mut report, message.transaction_reference());
        check_bank_operation_code(&mut report, message);
        check_currencies(&mut report, message);
        check_value_date(&mut report, message.value_date(), today);
        check_amount(&mut report, message.amount());
        check_bics(&mut report, message);
        check_parties(&mut report, message);
        check_line_budgets(&mut report, message);
        check_charge_details(&mut report, message);

        report
    }
}

fn check_free_text(report: &mut ValidationReport, message: &MT103) {
    if let Some(lines) = message.remittance_information() {
        if !lines.iter().all(|l| is_swift_charset(l)) {
            report.push(
                "remittanceInformation",
                "contains characters outside the SWIFT character set",
            );
        }
    }
    if let Some(lines) = message.sender_to_receiver_info() {
        if !lines.iter().all(|l| is_swift_charset(l)) {
            report.push(
                "senderToReceiverInfo",
                "contains characters outside the SWIFT character set",
            );
        }
    }
    for (field, party) in [
        ("orderingCustomer", message.ordering_customer()),
        ("beneficiaryCustomer", message.beneficiary_customer()),
    ] {
        let all_lines = party.name_lines().iter().chain(party.address_lines());
        for line in all_lines {
            if !is_swift_charset(line) {
                report.push(
                    field,
                    "name/address contains characters outside the SWIFT character set",
                );
                break;
            }
        }
    }
}

fn check_reference(report: &mut ValidationReport, reference: &str) {
    if !REFERENCE_REGEX.is_match(&reference.to_uppercase()) {
        report.push(
            "transactionReference",
            format!(
                "'{}' does not match the 1-16 character reference grammar",
                reference
            ),
        );
    }
}

fn check_bank_operation_code(report: &mut ValidationReport, message: &MT103) {
    if !message.field_23b.is_known_code() {
        report.push(
            "bankOperationCode",
            format!("'{}' is not a valid operation code", message.bank_operation_code()),
        );
    }
}

fn check_currency(report: &mut ValidationReport, field: &str, code: &str) {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        report.push(field, format!("'{}' must be exactly 3 ASCII letters", code));
    } else if !is_known_currency(code) {
        report.push(field, format!("'{}' is not a known ISO 4217 code", code));
    }
}

fn check_currencies(report: &mut ValidationReport, message: &MT103) {
    check_currency(report, "currency", message.currency());
    if let Some(code) = message.original_currency() {
        check_currency(report, "originalCurrency", code);
    }
    if let Some(f) = message.senders_charges() {
        check_currency(report, "sendersCharges", &f.currency);
    }
    if let Some(f) = message.receivers_charges() {
        check_currency(report, "receiversCharges", &f.currency);
    }
}

fn check_value_date(report: &mut ValidationReport, value_date: NaiveDate, today: NaiveDate) {
    let window = Duration::days(VALUE_DATE_WINDOW_DAYS);
    if value_date < today - window || value_date > today + window {
        report.push(
            "valueDate",
            format!(
                "{} is outside the accepted window of {} days around today",
                value_date, VALUE_DATE_WINDOW_DAYS
            ),
        );
    }
}

fn check_amount(report: &mut ValidationReport, amount: f64) {
    if amount <= 0.0 {
        report.push("amount", "must be greater than zero");
    }
    if amount > MAX_AMOUNT {
        report.push(
            "amount",
            format!("exceeds the maximum of {:.2}", MAX_AMOUNT),
        );
    }
    if fraction_digits_exceed(amount, 2) {
        report.push("amount", "carries more than 2 fractional digits");
    }
}

fn check_bics(report: &mut ValidationReport, message: &MT103) {
    let mut check = |field: &str, bic: Option<&str>| {
        if let Some(bic) = bic {
            if !is_valid_bic(bic) {
                report.push(field, format!("'{}' is not a valid 8/11-character BIC", bic));
            }
        }
    };

    check("orderingInstitution", message.ordering_institution());
    check(
        "sendersCorrespondent",
        message.field_53.as_ref().and_then(|f| f.bic()),
    );
    check(
        "receiversCorrespondent",
        message.field_54.as_ref().and_then(|f| f.bic()),
    );
    check(
        "intermediaryInstitution",
        message.field_56.as_ref().and_then(|f| f.bic()),
    );
    check(
        "accountWithInstitution",
        message.field_57.as_ref().and_then(|f| f.bic()),
    );
}

fn check_party_variant(report: &mut ValidationReport, field: &str, party: &Party) {
    match party {
        Party::WithBic { bic, .. } => {
            if !is_valid_bic(bic) {
                report.push(field, format!("'{}' is not a valid 8/11-character BIC", bic));
            }
        }
        Party::NameAddress { address, .. } => {
            if address.is_empty() || address.iter().all(|l| l.trim().is_empty()) {
                report.push(field, "name/address party requires a non-empty address");
            }
        }
    }
}

fn check_parties(report: &mut ValidationReport, message: &MT103) {
    check_party_variant(report, "orderingCustomer", &message.ordering_customer());
    check_party_variant(
        report,
        "beneficiaryCustomer",
        &message.beneficiary_customer(),
    );
}

fn check_lines(report: &mut ValidationReport, field: &str, lines: &[String], max_lines: usize) {
    if lines.len() > max_lines {
        report.push(
            field,
            format!("has {} lines, maximum is {}", lines.len(), max_lines),
        );
    }
    if lines.iter().any(|l| l.len() > 35) {
        report.push(field, "line exceeds 35 characters");
    }
}

fn check_line_budgets(report: &mut ValidationReport, message: &MT103) {
    for (field, party) in [
        ("orderingCustomer", message.ordering_customer()),
        ("beneficiaryCustomer", message.beneficiary_customer()),
    ] {
        check_lines(report, field, party.name_lines(), 4);
        check_lines(report, field, party.address_lines(), 3);
    }
    if let Some(lines) = message.remittance_information() {
        check_lines(report, "remittanceInformation", lines, 4);
    }
    if let Some(lines) = message.sender_to_receiver_info() {
        check_lines(report, "senderToReceiverInfo", lines, 6);
    }
}

fn check_charge_details(report: &mut ValidationReport, message: &MT103) {
    if let Some(details) = message.charge_details() {
        if details.charge_amount.is_some() {
            match details.charge_currency.as_deref() {
                Some(code) => check_currency(report, "chargeDetails", code),
                None => report.push(
                    "chargeDetails",
                    "charge amount requires a charge currency",
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MT103;

    fn today() -> NaiveDate {
        // Fixed reference date so the value-date window is deterministic
        NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
    }

    fn parse(block4: &str) -> MT103 {
        MT103::parse_from_block4(block4).unwrap()
    }

    fn valid_block4() -> String {
        ":20:REF1\n:23B:CRED\n:32A:241215EUR1000,00\n:50K:/12345678\nALICE\n1 MAIN ST\n:59:/87654321\nBOB\n2 OAK AVE\n:71A:SHA".to_string()
    }

    #[test]
    fn test_valid_message_passes() {
        let report = SyntacticValidator::validate_as_of(&parse(&valid_block4()), today());
        assert!(report.is_valid(), "unexpected: {}", report.summary());
    }

    #[test]
    fn test_negative_amount() {
        let block4 = valid_block4().replace("EUR1000,00", "EUR-50,00");
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report
            .violations
            .iter()
            .any(|v| v.field == "amount" && v.message.contains("greater than zero")));
    }

    #[test]
    fn test_amount_boundaries() {
        for (amount, ok) in [
            ("0,01", true),
            ("999999999999,99", true),
            ("1000000000000,00", false),
        ] {
            let block4 = valid_block4().replace("1000,00", amount);
            let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
            let amount_violations = report
                .violations
                .iter()
                .filter(|v| v.field == "amount")
                .count();
            assert_eq!(amount_violations == 0, ok, "amount {}", amount);
        }
    }

    #[test]
    fn test_excess_fraction_digits() {
        let block4 = valid_block4().replace("1000,00", "1000,001");
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report
            .violations
            .iter()
            .any(|v| v.field == "amount" && v.message.contains("fractional")));
    }

    #[test]
    fn test_unknown_currency() {
        let block4 = valid_block4().replace("EUR1000,00", "ZZZ1000,00");
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report.violations.iter().any(|v| v.field == "currency"));
    }

    #[test]
    fn test_reference_length_boundaries() {
        // 16 characters passes, 17 fails
        let block4 = valid_block4().replace(":20:REF1", ":20:ABCDEFGH12345678");
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report.is_valid(), "16 chars: {}", report.summary());

        let block4 = valid_block4().replace(":20:REF1", ":20:ABCDEFGH123456789");
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report
            .violations
            .iter()
            .any(|v| v.field == "transactionReference"));
    }

    #[test]
    fn test_value_date_window() {
        // 241215 is within a year of the reference date; 991215 is not
        let block4 = valid_block4().replace("241215", "991215");
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report.violations.iter().any(|v| v.field == "valueDate"));
    }

    #[test]
    fn test_bic_length_boundaries() {
        for (bic, ok) in [
            ("DEUTDEF", false),
            ("DEUTDEFF", true),
            ("DEUTDEFF500", true),
            ("DEUTDEFF5000", false),
        ] {
            let block4 = format!("{}\n:57A:{}", valid_block4(), bic);
            let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
            let bic_ok = !report
                .violations
                .iter()
                .any(|v| v.field == "accountWithInstitution");
            assert_eq!(bic_ok, ok, "bic {}", bic);
        }
    }

    #[test]
    fn test_beneficiary_without_address() {
        let block4 = valid_block4().replace("/87654321\nBOB\n2 OAK AVE", "BOB");
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report
            .violations
            .iter()
            .any(|v| v.field == "beneficiaryCustomer" && v.message.contains("address")));
    }

    #[test]
    fn test_address_line_budget() {
        // 3 address lines pass, 4 fail
        let block4 = valid_block4().replace("2 OAK AVE", "2 OAK AVE\nFLOOR 2\nSPRINGFIELD");
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report.is_valid(), "{}", report.summary());

        let block4 =
            valid_block4().replace("2 OAK AVE", "2 OAK AVE\nFLOOR 2\nSPRINGFIELD\nUSA");
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report
            .violations
            .iter()
            .any(|v| v.field == "beneficiaryCustomer" && v.message.contains("lines")));
    }

    #[test]
    fn test_remittance_budget() {
        let block4 = format!("{}\n:70:L1\nL2\nL3\nL4", valid_block4());
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report.is_valid(), "{}", report.summary());

        let block4 = format!("{}\n:70:L1\nL2\nL3\nL4\nL5", valid_block4());
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report
            .violations
            .iter()
            .any(|v| v.field == "remittanceInformation"));
    }

    #[test]
    fn test_violations_are_collected_not_short_circuited() {
        let block4 = valid_block4()
            .replace("EUR1000,00", "ZZZ-5,00")
            .replace(":20:REF1", ":20:ABCDEFGH123456789");
        let report = SyntacticValidator::validate_as_of(&parse(&block4), today());
        assert!(report.violations.len() >= 3, "{}", report.summary());
    }
}
