//! MT103: Single Customer Credit Transfer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{DecodingError, ParseError, Result};
use crate::fields::{
    Field20, Field23B, Field32A, Field33B, Field50, Field52A, Field53, Field54, Field56,
    Field57, Field59, Field70, Field71A, Field71F, Field71G, Field72, Party,
};
use crate::tokenizer::{self, FieldEntry};
use crate::traits::{SwiftField, SwiftMessageBody};

/// Base tags the MT103 decoder claims; an unknown option letter on one of
/// these is a decoding error rather than a pass-through
const MT103_BASE_TAGS: &[&str] = &[
    "20", "23", "32", "33", "50", "52", "53", "54", "56", "57", "59", "70", "71", "72",
];

/// Charge allocation, assembled from fields 71A and 71G
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeDetails {
    /// BEN, OUR or SHA
    pub bearer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_currency: Option<String>,
}

/// **MT103: Single Customer Credit Transfer**
///
/// Typed field set for the message. Mandatory fields are plain members,
/// optional ones are `Option`s. Tags the decoder does not map are kept in
/// `extra_fields`, in order, for diagnostics and lossless rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MT103 {
    /// Field 20: sender's reference
    pub field_20: Field20,
    /// Field 23B: bank operation code
    pub field_23b: Field23B,
    /// Field 32A: value date, currency, settlement amount
    pub field_32a: Field32A,
    /// Field 33B: original currency and amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_33b: Option<Field33B>,
    /// Field 50A/50K: ordering customer
    pub field_50: Field50,
    /// Field 52A: ordering institution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_52a: Option<Field52A>,
    /// Field 53A/53B: sender's correspondent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_53: Option<Field53>,
    /// Field 54A/54B: receiver's correspondent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_54: Option<Field54>,
    /// Field 56A/56C/56D: intermediary institution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_56: Option<Field56>,
    /// Field 57A/57B/57C/57D: account with institution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_57: Option<Field57>,
    /// Field 59/59A: beneficiary customer
    pub field_59: Field59,
    /// Field 70: remittance information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_70: Option<Field70>,
    /// Field 71A: details of charges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_71a: Option<Field71A>,
    /// Field 71F: sender's charges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_71f: Option<Field71F>,
    /// Field 71G: receiver's charges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_71g: Option<Field71G>,
    /// Field 72: sender to receiver information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_72: Option<Field72>,
    /// Unmapped tags, preserved in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_fields: Vec<FieldEntry>,
}

impl MT103 {
    /// Convenience: frame a block-4 string and decode it
    pub fn parse_from_block4(block4: &str) -> Result<Self> {
        let entries = tokenizer::parse_block4_fields(block4)?;
        Self::from_entries(&entries)
    }

    pub fn transaction_reference(&self) -> &str {
        &self.field_20.reference
    }

    pub fn bank_operation_code(&self) -> &str {
        &self.field_23b.code
    }

    pub fn value_date(&self) -> NaiveDate {
        self.field_32a.value_date
    }

    pub fn currency(&self) -> &str {
        &self.field_32a.currency
    }

    pub fn amount(&self) -> f64 {
        self.field_32a.amount
    }

    pub fn original_currency(&self) -> Option<&str> {
        self.field_33b.as_ref().map(|f| f.currency.as_str())
    }

    pub fn original_amount(&self) -> Option<f64> {
        self.field_33b.as_ref().map(|f| f.amount)
    }

    pub fn ordering_customer(&self) -> Party {
        self.field_50.to_party()
    }

    pub fn beneficiary_customer(&self) -> Party {
        self.field_59.to_party()
    }

    pub fn ordering_institution(&self) -> Option<&str> {
        self.field_52a.as_ref().map(|f| f.bic.as_str())
    }

    pub fn intermediary_institution(&self) -> Option<&Field56> {
        self.field_56.as_ref()
    }

    pub fn account_with_institution(&self) -> Option<&Field57> {
        self.field_57.as_ref()
    }

    pub fn remittance_information(&self) -> Option<&[String]> {
        self.field_70.as_ref().map(|f| f.information.as_slice())
    }

    pub fn sender_to_receiver_info(&self) -> Option<&[String]> {
        self.field_72.as_ref().map(|f| f.information.as_slice())
    }

    pub fn senders_charges(&self) -> Option<&Field71F> {
        self.field_71f.as_ref()
    }

    pub fn receivers_charges(&self) -> Option<&Field71G> {
        self.field_71g.as_ref()
    }

    /// Charge allocation: bearer from 71A, amount/currency from 71G when present
    pub fn charge_details(&self) -> Option<ChargeDetails> {
        self.field_71a.as_ref().map(|f| ChargeDetails {
            bearer: f.code.clone(),
            charge_amount: self.field_71g.as_ref().map(|g| g.amount),
            charge_currency: self.field_71g.as_ref().map(|g| g.currency.clone()),
        })
    }
}

impl SwiftMessageBody for MT103 {
    fn message_type() -> &'static str {
        "103"
    }

    fn from_entries(entries: &[FieldEntry]) -> Result<Self> {
        let mut field_20: Option<Field20> = None;
        let mut field_23b: Option<Field23B> = None;
        let mut field_32a: Option<Field32A> = None;
        let mut field_33b: Option<Field33B> = None;
        let mut field_50: Option<Field50> = None;
        let mut field_52a: Option<Field52A> = None;
        let mut field_53: Option<Field53> = None;
        let mut field_54: Option<Field54> = None;
        let mut field_56: Option<Field56> = None;
        let mut field_57: Option<Field57> = None;
        let mut field_59: Option<Field59> = None;
        let mut field_70: Option<Field70> = None;
        let mut field_71a: Option<Field71A> = None;
        let mut field_71f: Option<Field71F> = None;
        let mut field_71g: Option<Field71G> = None;
        let mut field_72: Option<Field72> = None;
        let mut extra_fields: Vec<FieldEntry> = Vec::new();

        // First occurrence wins; duplicates join the extras for diagnostics
        macro_rules! assign {
            ($slot:ident, $value:expr, $entry:expr) => {
                if $slot.is_none() {
                    $slot = Some($value);
                } else {
                    extra_fields.push($entry.clone());
                }
            };
        }

        for entry in entries {
            let option = entry.option.as_deref();
            match entry.full_tag().as_str() {
                "20" => assign!(field_20, Field20::parse(&entry.value)?, entry),
                "23B" => assign!(field_23b, Field23B::parse(&entry.value)?, entry),
                "32A" => assign!(field_32a, Field32A::parse(&entry.value)?, entry),
                "33B" => assign!(field_33b, Field33B::parse(&entry.value)?, entry),
                "50A" | "50K" => assign!(
                    field_50,
                    Field50::parse_with_option(&entry.value, option)?,
                    entry
                ),
                "52A" => assign!(field_52a, Field52A::parse(&entry.value)?, entry),
                "53A" | "53B" => assign!(
                    field_53,
                    Field53::parse_with_option(&entry.value, option)?,
                    entry
                ),
                "54A" | "54B" => assign!(
                    field_54,
                    Field54::parse_with_option(&entry.value, option)?,
                    entry
                ),
                "56A" | "56C" | "56D" => assign!(
                    field_56,
                    Field56::parse_with_option(&entry.value, option)?,
                    entry
                ),
                "57A" | "57B" | "57C" | "57D" => assign!(
                    field_57,
                    Field57::parse_with_option(&entry.value, option)?,
                    entry
                ),
                "59" | "59A" => assign!(
                    field_59,
                    Field59::parse_with_option(&entry.value, option)?,
                    entry
                ),
                "70" => assign!(field_70, Field70::parse(&entry.value)?, entry),
                "71A" => assign!(field_71a, Field71A::parse(&entry.value)?, entry),
                "71F" => assign!(field_71f, Field71F::parse(&entry.value)?, entry),
                "71G" => assign!(field_71g, Field71G::parse(&entry.value)?, entry),
                "72" => assign!(field_72, Field72::parse(&entry.value)?, entry),
                _ if MT103_BASE_TAGS.contains(&entry.tag.as_str()) => {
                    return Err(DecodingError::UnsupportedOption {
                        tag: entry.tag.clone(),
                        option: entry.option.clone().unwrap_or_else(|| "(none)".to_string()),
                    }
                    .into());
                }
                _ => extra_fields.push(entry.clone()),
            }
        }

        let missing = |tag: &str| -> ParseError {
            DecodingError::missing_tag(tag, Self::message_type()).into()
        };

        Ok(MT103 {
            field_20: field_20.ok_or_else(|| missing("20"))?,
            field_23b: field_23b.ok_or_else(|| missing("23B"))?,
            field_32a: field_32a.ok_or_else(|| missing("32A"))?,
            field_33b,
            field_50: field_50.ok_or_else(|| missing("50"))?,
            field_52a,
            field_53,
            field_54,
            field_56,
            field_57,
            field_59: field_59.ok_or_else(|| missing("59"))?,
            field_70,
            field_71a,
            field_71f,
            field_71g,
            field_72,
            extra_fields,
        })
    }

    fn to_mt_string(&self) -> String {
        let mut lines: Vec<String> = vec![
            self.field_20.to_swift_string(),
            self.field_23b.to_swift_string(),
            self.field_32a.to_swift_string(),
        ];
        if let Some(ref f) = self.field_33b {
            lines.push(f.to_swift_string());
        }
        lines.push(self.field_50.to_swift_string());
        if let Some(ref f) = self.field_52a {
            lines.push(f.to_swift_string());
        }
        if let Some(ref f) = self.field_53 {
            lines.push(f.to_swift_string());
        }
        if let Some(ref f) = self.field_54 {
            lines.push(f.to_swift_string());
        }
        if let Some(ref f) = self.field_56 {
            lines.push(f.to_swift_string());
        }
        if let Some(ref f) = self.field_57 {
            lines.push(f.to_swift_string());
        }
        lines.push(self.field_59.to_swift_string());
        if let Some(ref f) = self.field_70 {
            lines.push(f.to_swift_string());
        }
        if let Some(ref f) = self.field_71a {
            lines.push(f.to_swift_string());
        }
        if let Some(ref f) = self.field_71f {
            lines.push(f.to_swift_string());
        }
        if let Some(ref f) = self.field_71g {
            lines.push(f.to_swift_string());
        }
        if let Some(ref f) = self.field_72 {
            lines.push(f.to_swift_string());
        }
        for entry in &self.extra_fields {
            lines.push(entry.to_swift_string());
        }
        lines.join("\n")
    }
}
