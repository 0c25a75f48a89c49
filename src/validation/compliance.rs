//! Compliance validator
//!
//! Business rules evaluated after the syntactic pass succeeds. Findings
//! carry a severity; the message passes compliance iff no violation is
//! High or Critical. Sub-violation findings are reported as warnings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::syntactic::VALUE_DATE_WINDOW_DAYS;
use crate::fields::swift_utils::is_swift_charset;
use crate::fields::Party;
use crate::messages::MT103;

/// Settlement amount that triggers a Critical violation, any currency
pub const CRITICAL_AMOUNT_LIMIT: f64 = 10_000_000.0;

/// Settlement amount that triggers a large-amount warning
pub const WARNING_AMOUNT_LIMIT: f64 = 1_000_000.0;

/// Finding severity, ordered
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// One compliance rule violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceViolation {
    /// Rule family, e.g. "AmountLimit", "Sanctions"
    pub violation_type: String,
    pub field: String,
    pub description: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

/// Advisory finding that does not affect the pass verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceWarning {
    pub field: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of the compliance pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub violations: Vec<ComplianceViolation>,
    pub warnings: Vec<ComplianceWarning>,
}

impl ComplianceReport {
    /// PASS iff no violation with severity High or above
    pub fn passed(&self) -> bool {
        !self
            .violations
            .iter()
            .any(|v| v.severity >= Severity::High)
    }

    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{} ({:?}): {}", v.violation_type, v.severity, v.description))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn violation(&mut self, violation_type: &str, field: &str, severity: Severity, description: String) {
        self.violations.push(ComplianceViolation {
            violation_type: violation_type.to_string(),
            field: field.to_string(),
            description,
            severity,
            timestamp: Utc::now(),
        });
    }

    fn warning(&mut self, field: &str, description: String) {
        self.warnings.push(ComplianceWarning {
            field: field.to_string(),
            description,
            timestamp: Utc::now(),
        });
    }
}

/// Result of screening one party identifier pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanctionsHit {
    pub severity: Severity,
    pub label: String,
}

/// Pluggable screening over `(party name, party account)`
pub trait SanctionsScreener: Send + Sync {
    fn screen(&self, name: &str, account: Option<&str>) -> Option<SanctionsHit>;
}

/// Default screener: case-insensitive substring match against a keyword set.
/// Every hit is Critical.
#[derive(Debug, Clone, Default)]
pub struct KeywordScreener {
    keywords: Vec<String>,
}

impl KeywordScreener {
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
        }
    }
}

impl SanctionsScreener for KeywordScreener {
    fn screen(&self, name: &str, account: Option<&str>) -> Option<SanctionsHit> {
        let name = name.to_lowercase();
        let account = account.map(|a| a.to_lowercase());
        for keyword in &self.keywords {
            let hit = name.contains(keyword)
                || account.as_deref().is_some_and(|a| a.contains(keyword));
            if hit {
                return Some(SanctionsHit {
                    severity: Severity::Critical,
                    label: format!("keyword match: {}", keyword),
                });
            }
        }
        None
    }
}

/// Compliance validator with its screening hook
pub struct ComplianceValidator {
    screener: Arc<dyn SanctionsScreener>,
}

impl ComplianceValidator {
    pub fn new(screener: Arc<dyn SanctionsScreener>) -> Self {
        Self { screener }
    }

    /// Validate against today's date
    pub fn validate(&self, message: &MT103) -> ComplianceReport {
        self.validate_as_of(message, Utc::now().date_naive())
    }

    /// Validate with an explicit reference date
    pub fn validate_as_of(&self, message: &MT103, today: NaiveDate) -> ComplianceReport {
        let mut report = ComplianceReport::default();

        self.check_original_currency(&mut report, message);
        self.check_value_date(&mut report, message, today);
        self.check_customer_equality(&mut report, message);
        self.check_amount_limits(&mut report, message);
        self.check_sanctions(&mut report, message);
        self.check_character_set(&mut report, message);
        self.check_charge_bearer(&mut report, message);

        report
    }

    fn check_original_currency(&self, report: &mut ComplianceReport, message: &MT103) {
        if let Some(original) = message.original_currency() {
            if original == message.currency() {
                report.violation(
                    "CrossFieldCurrency",
                    "originalCurrency",
                    Severity::Low,
                    format!(
                        "original currency {} equals settlement currency",
                        original
                    ),
                );
            }
        }
    }

    fn check_value_date(
        &self,
        report: &mut ComplianceReport,
        message: &MT103,
        today: NaiveDate,
    ) {
        let delta = (message.value_date() - today).num_days().abs();
        if delta > VALUE_DATE_WINDOW_DAYS {
            report.violation(
                "ValueDateRange",
                "valueDate",
                Severity::Medium,
                format!("value date is {} days away from today", delta),
            );
        }
    }

    fn check_customer_equality(&self, report: &mut ComplianceReport, message: &MT103) {
        let ordering = message.ordering_customer();
        let beneficiary = message.beneficiary_customer();
        if let (Some(a), Some(b)) = (ordering.account(), beneficiary.account()) {
            if a.eq_ignore_ascii_case(b) {
                report.violation(
                    "CustomerEquality",
                    "beneficiaryCustomer",
                    Severity::Medium,
                    "ordering and beneficiary accounts are equal".to_string(),
                );
            }
        }
    }

    fn check_amount_limits(&self, report: &mut ComplianceReport, message: &MT103) {
        let amount = message.amount();
        if amount > CRITICAL_AMOUNT_LIMIT {
            report.violation(
                "AmountLimit",
                "amount",
                Severity::Critical,
                format!(
                    "amount {:.2} exceeds the limit of {:.2}",
                    amount, CRITICAL_AMOUNT_LIMIT
                ),
            );
        } else if amount >= WARNING_AMOUNT_LIMIT {
            report.warning(
                "amount",
                format!("large amount {:.2} flagged for review", amount),
            );
        }
    }

    fn screen_party(&self, report: &mut ComplianceReport, field: &str, party: &Party) {
        if let Some(hit) = self
            .screener
            .screen(&party.display_name(), party.account())
        {
            if hit.severity >= Severity::Critical {
                report.violation(
                    "Sanctions",
                    field,
                    hit.severity,
                    format!("sanctions screening hit: {}", hit.label),
                );
            } else {
                report.warning(
                    field,
                    format!("sanctions screening flag: {}", hit.label),
                );
            }
        }
    }

    fn check_sanctions(&self, report: &mut ComplianceReport, message: &MT103) {
        self.screen_party(report, "orderingCustomer", &message.ordering_customer());
        self.screen_party(
            report,
            "beneficiaryCustomer",
            &message.beneficiary_customer(),
        );
    }

    fn check_character_set(&self, report: &mut ComplianceReport, message: &MT103) {
        let remittance = message.remittance_information().unwrap_or(&[]);
        let s2r = message.sender_to_receiver_info().unwrap_or(&[]);
        for (field, lines) in [
            ("remittanceInformation", remittance),
            ("senderToReceiverInfo", s2r),
        ] {
            if !lines.iter().all(|l| is_swift_charset(l)) {
                report.violation(
                    "CharacterSet",
                    field,
                    Severity::High,
                    "free text contains characters outside the SWIFT character set"
                        .to_string(),
                );
            }
        }
    }

    fn check_charge_bearer(&self, report: &mut ComplianceReport, message: &MT103) {
        if let Some(details) = message.charge_details() {
            if details.bearer == "BEN" && message.amount() < 100.0 {
                report.warning(
                    "chargeDetails",
                    "beneficiary bears charges on a sub-100 amount".to_string(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MT103;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
    }

    fn validator() -> ComplianceValidator {
        ComplianceValidator::new(Arc::new(KeywordScreener::new(["BLOCKED", "EMBARGO"])))
    }

    fn parse(block4: &str) -> MT103 {
        MT103::parse_from_block4(block4).unwrap()
    }

    fn valid_block4() -> String {
        ":20:REF1\n:23B:CRED\n:32A:241215EUR1000,00\n:50K:/12345678\nALICE\n1 MAIN ST\n:59:/87654321\nBOB\n2 OAK AVE\n:71A:SHA".to_string()
    }

    #[test]
    fn test_clean_message_passes() {
        let report = validator().validate_as_of(&parse(&valid_block4()), today());
        assert!(report.passed());
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_amount_over_critical_limit() {
        let block4 = valid_block4().replace("EUR1000,00", "USD20000000,00");
        let report = validator().validate_as_of(&parse(&block4), today());
        assert!(!report.passed());
        assert!(report
            .violations
            .iter()
            .any(|v| v.violation_type == "AmountLimit" && v.severity == Severity::Critical));
    }

    #[test]
    fn test_large_amount_is_warning_only() {
        let block4 = valid_block4().replace("EUR1000,00", "USD5000000,00");
        let report = validator().validate_as_of(&parse(&block4), today());
        assert!(report.passed());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_equal_accounts_is_medium() {
        let block4 = valid_block4().replace("/87654321", "/12345678");
        let report = validator().validate_as_of(&parse(&block4), today());
        // Medium violations do not fail the pass verdict
        assert!(report.passed());
        assert!(report
            .violations
            .iter()
            .any(|v| v.violation_type == "CustomerEquality" && v.severity == Severity::Medium));
    }

    #[test]
    fn test_sanctions_keyword_hit_fails() {
        let block4 = valid_block4().replace("BOB", "BLOCKED TRADING LLC");
        let report = validator().validate_as_of(&parse(&block4), today());
        assert!(!report.passed());
        assert!(report
            .violations
            .iter()
            .any(|v| v.violation_type == "Sanctions"));
    }

    #[test]
    fn test_sanctions_matches_account_too() {
        let block4 = valid_block4().replace("/87654321", "/EMBARGO99");
        let report = validator().validate_as_of(&parse(&block4), today());
        assert!(!report.passed());
    }

    #[test]
    fn test_original_currency_equality_is_low() {
        let block4 = valid_block4().replace(
            ":32A:241215EUR1000,00",
            ":32A:241215EUR1000,00\n:33B:EUR1000,00",
        );
        let report = validator().validate_as_of(&parse(&block4), today());
        assert!(report.passed());
        assert!(report
            .violations
            .iter()
            .any(|v| v.violation_type == "CrossFieldCurrency" && v.severity == Severity::Low));
    }

    #[test]
    fn test_ben_small_amount_warning() {
        let block4 = valid_block4()
            .replace("EUR1000,00", "EUR50,00")
            .replace(":71A:SHA", ":71A:BEN");
        let report = validator().validate_as_of(&parse(&block4), today());
        assert!(report.passed());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.field == "chargeDetails"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }
}
