//! # Synthetic Message Generator
//!
//! Test-mode traffic source: renders valid and deliberately-invalid MT103
//! payloads on a cadence and enqueues them on the input queue. Each
//! message is valid with the configured probability; otherwise an invalid
//! variant is drawn uniformly.

use chrono::{Duration as ChronoDuration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::TestModeSettings;
use crate::fields::{
    Field20, Field23B, Field32A, Field50, Field50K, Field59, Field59NoOption, Field71A,
};
use crate::headers::{ApplicationHeader, BasicHeader};
use crate::queue::MessageQueue;
use crate::state::ProcessorState;
use crate::traits::SwiftField;

const SENDER_BICS: &[&str] = &["DEUTDEFF", "CHASUS33", "MIDLGB22", "BNPAFRPP"];
const RECEIVER_BICS: &[&str] = &["BARCGB22", "CITIUS33", "INGBNL2A", "UBSWCHZH"];
const CURRENCIES: &[&str] = &["EUR", "USD", "GBP", "CHF"];
const NAMES: &[&str] = &[
    "ACME TRADING LTD",
    "GLOBEX INDUSTRIES",
    "NORTHWIND EXPORTS",
    "CONTOSO PARTNERS",
];
const STREETS: &[&str] = &[
    "1 MAIN STREET",
    "22 HARBOUR ROAD",
    "5 MARKET SQUARE",
    "18 STATION LANE",
];

/// Deliberately-broken message variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidKind {
    MissingTransactionReference,
    InvalidAmount,
    MissingCurrency,
    InvalidBankCode,
    MissingBeneficiary,
}

const INVALID_KINDS: &[InvalidKind] = &[
    InvalidKind::MissingTransactionReference,
    InvalidKind::InvalidAmount,
    InvalidKind::MissingCurrency,
    InvalidKind::InvalidBankCode,
    InvalidKind::MissingBeneficiary,
];

/// Synthetic MT103 generator
pub struct TestMessageGenerator {
    queue: Arc<dyn MessageQueue>,
    input_queue: String,
    state: Arc<ProcessorState>,
    settings: TestModeSettings,
}

impl TestMessageGenerator {
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        input_queue: String,
        state: Arc<ProcessorState>,
        settings: TestModeSettings,
    ) -> Self {
        Self {
            queue,
            input_queue,
            state,
            settings,
        }
    }

    /// Run the generation loop until shutdown; idles while test mode is off
    pub async fn run(&self, shutdown: CancellationToken) {
        let interval = Duration::from_secs(self.settings.generation_interval_seconds.max(1));
        info!(
            interval_seconds = interval.as_secs(),
            batch_size = self.settings.batch_size,
            "test message generator started"
        );
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
            if !self.state.test_mode_enabled() {
                continue;
            }
            for _ in 0..self.settings.batch_size {
                let payload = self.generate();
                if let Err(err) = self.queue.send(&self.input_queue, &payload).await {
                    warn!(error = %err, "generator enqueue failed");
                    break;
                }
            }
            debug!(batch = self.settings.batch_size, "generated test batch");
        }
        info!("test message generator stopped");
    }

    /// Produce one payload, valid with the configured probability
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let valid = rng.gen_range(0u8..100) < self.settings.valid_message_percentage;
        if valid {
            self.render(None)
        } else {
            let kind = INVALID_KINDS
                .choose(&mut rng)
                .copied()
                .unwrap_or(InvalidKind::InvalidAmount);
            self.render(Some(kind))
        }
    }

    /// Render a message to wire text, optionally broken in one known way
    pub fn render(&self, invalid: Option<InvalidKind>) -> String {
        let mut rng = rand::thread_rng();

        let reference = format!(
            "TST{}",
            &Uuid::new_v4().simple().to_string()[..12].to_uppercase()
        );
        let currency = CURRENCIES.choose(&mut rng).copied().unwrap_or("EUR");
        let amount = (rng.gen_range(10.0..250_000.0f64) * 100.0).round() / 100.0;
        let value_date =
            Utc::now().date_naive() + ChronoDuration::days(rng.gen_range(-20..20));
        let sender_bic = SENDER_BICS.choose(&mut rng).copied().unwrap_or("DEUTDEFF");
        let receiver_bic = RECEIVER_BICS.choose(&mut rng).copied().unwrap_or("BARCGB22");

        let field_20 = Field20 {
            reference: reference.clone(),
        };
        let field_23b = Field23B {
            code: if matches!(invalid, Some(InvalidKind::InvalidBankCode)) {
                "XXZZ".to_string()
            } else {
                "CRED".to_string()
            },
        };
        let field_32a = Field32A {
            value_date,
            currency: currency.to_string(),
            amount: if matches!(invalid, Some(InvalidKind::InvalidAmount)) {
                -amount
            } else {
                amount
            },
        };
        let ordering = Field50::K(Field50K {
            account: Some(format!("{:08}", rng.gen_range(10_000_000u32..100_000_000))),
            name: vec![NAMES.choose(&mut rng).copied().unwrap_or(NAMES[0]).to_string()],
            address: vec![STREETS.choose(&mut rng).copied().unwrap_or(STREETS[0]).to_string()],
        });
        let beneficiary = Field59::NoOption(Field59NoOption {
            account: Some(format!("{:08}", rng.gen_range(10_000_000u32..100_000_000))),
            name: vec![NAMES.choose(&mut rng).copied().unwrap_or(NAMES[1]).to_string()],
            address: vec![STREETS.choose(&mut rng).copied().unwrap_or(STREETS[1]).to_string()],
        });
        let field_71a = Field71A {
            code: "SHA".to_string(),
        };

        let mut lines: Vec<String> = Vec::new();
        if !matches!(invalid, Some(InvalidKind::MissingTransactionReference)) {
            lines.push(field_20.to_swift_string());
        }
        lines.push(field_23b.to_swift_string());
        let field_32a_line = field_32a.to_swift_string();
        if matches!(invalid, Some(InvalidKind::MissingCurrency)) {
            lines.push(field_32a_line.replacen(currency, "", 1));
        } else {
            lines.push(field_32a_line);
        }
        lines.push(ordering.to_swift_string());
        if !matches!(invalid, Some(InvalidKind::MissingBeneficiary)) {
            lines.push(beneficiary.to_swift_string());
        }
        lines.push(field_71a.to_swift_string());

        let basic = BasicHeader {
            application_id: "F".to_string(),
            service_id: "01".to_string(),
            logical_terminal: format!("{sender_bic}AXXX"),
            session_number: "0001".to_string(),
            sequence_number: format!("{:06}", rng.gen_range(1u32..1_000_000)),
        };
        let application = ApplicationHeader {
            direction: "I".to_string(),
            message_type: "103".to_string(),
            destination_address: format!("{receiver_bic}XXXX"),
            priority: "N".to_string(),
            remainder: String::new(),
        };

        format!(
            "{{1:{}}}{{2:{}}}{{4:\n{}\n-}}",
            basic,
            application,
            lines.join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SwiftParser;
    use crate::queue::InMemoryQueue;
    use crate::validation::SyntacticValidator;

    fn generator(valid_percentage: u8) -> TestMessageGenerator {
        TestMessageGenerator::new(
            Arc::new(InMemoryQueue::new()),
            "input".to_string(),
            Arc::new(ProcessorState::new(true)),
            TestModeSettings {
                enabled: true,
                generation_interval_seconds: 1,
                valid_message_percentage: valid_percentage,
                batch_size: 1,
            },
        )
    }

    #[test]
    fn test_valid_messages_parse_and_validate() {
        let generator = generator(100);
        for _ in 0..20 {
            let payload = generator.render(None);
            let parsed = SwiftParser::parse_auto(&payload).unwrap();
            let report = match &parsed {
                crate::parsed_message::ParsedSwiftMessage::MT103(m) => {
                    SyntacticValidator::validate(&m.fields)
                }
            };
            assert!(report.is_valid(), "{}", report.summary());
        }
    }

    #[test]
    fn test_missing_reference_fails_decode() {
        let generator = generator(0);
        let payload = generator.render(Some(InvalidKind::MissingTransactionReference));
        assert!(SwiftParser::parse_auto(&payload).is_err());
    }

    #[test]
    fn test_missing_beneficiary_fails_decode() {
        let generator = generator(0);
        let payload = generator.render(Some(InvalidKind::MissingBeneficiary));
        assert!(SwiftParser::parse_auto(&payload).is_err());
    }

    #[test]
    fn test_invalid_amount_fails_validation() {
        let generator = generator(0);
        let payload = generator.render(Some(InvalidKind::InvalidAmount));
        let parsed = SwiftParser::parse_auto(&payload).unwrap();
        let report = match &parsed {
            crate::parsed_message::ParsedSwiftMessage::MT103(m) => {
                SyntacticValidator::validate(&m.fields)
            }
        };
        assert!(report
            .violations
            .iter()
            .any(|v| v.field == "amount"));
    }

    #[test]
    fn test_invalid_bank_code_fails_validation() {
        let generator = generator(0);
        let payload = generator.render(Some(InvalidKind::InvalidBankCode));
        let parsed = SwiftParser::parse_auto(&payload).unwrap();
        let report = match &parsed {
            crate::parsed_message::ParsedSwiftMessage::MT103(m) => {
                SyntacticValidator::validate(&m.fields)
            }
        };
        assert!(report
            .violations
            .iter()
            .any(|v| v.field == "bankOperationCode"));
    }
}
