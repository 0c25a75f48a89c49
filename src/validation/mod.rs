//! # Validation
//!
//! Two orthogonal passes over a decoded MT103:
//!
//! - [`syntactic`]: SWIFT character set, grammars, lengths, BIC/currency/
//!   date/amount rules. All violations are collected, never short-circuited.
//! - [`compliance`]: business rules with severities and a pluggable
//!   sanctions hook. Runs only after the syntactic pass succeeds.

pub mod compliance;
pub mod currencies;
pub mod syntactic;

use serde::{Deserialize, Serialize};

pub use compliance::{
    ComplianceReport, ComplianceValidator, ComplianceViolation, ComplianceWarning,
    KeywordScreener, SanctionsHit, SanctionsScreener, Severity,
};
pub use syntactic::SyntacticValidator;

/// One syntactic rule violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Field the rule applies to, in data-model naming ("amount",
    /// "orderingCustomer", ...)
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Outcome of the syntactic pass; empty report = success
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Joined violation text for batch error surfaces
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub(crate) fn push(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(field, message));
    }
}
