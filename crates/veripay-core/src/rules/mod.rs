//! Declarative, ordered field-extraction rules.
//!
//! Each provider ships a rule table pairing a label pattern with a value
//! pattern and a transform. Rules are applied in order over the flattened
//! text with a forward cursor: a matched rule advances the cursor past its
//! value, which is what disambiguates repeated labels (bank slips print
//! `Account` twice). The value window is bounded at the next known label,
//! since flattened text has no structural delimiters. A rule that fails to
//! match leaves its field absent and never aborts the set.

pub mod amounts;
pub mod dates;
pub mod names;

use std::collections::HashMap;

use chrono::NaiveDateTime;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::trace;

use crate::text::RawText;

/// Canonical field slots a rule can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Payer,
    PayerAccount,
    Receiver,
    ReceiverAccount,
    Amount,
    Date,
    Reference,
    Reason,
    ServiceCharge,
    Vat,
    TotalAmount,
}

impl FieldKey {
    /// Caller-facing field name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKey::Payer => "payer",
            FieldKey::PayerAccount => "payerAccount",
            FieldKey::Receiver => "receiver",
            FieldKey::ReceiverAccount => "receiverAccount",
            FieldKey::Amount => "amount",
            FieldKey::Date => "date",
            FieldKey::Reference => "reference",
            FieldKey::Reason => "reason",
            FieldKey::ServiceCharge => "serviceCharge",
            FieldKey::Vat => "vat",
            FieldKey::TotalAmount => "totalAmount",
        }
    }
}

/// Value transform applied to the raw matched token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Trimmed text as matched (account numbers, references; masking kept).
    Verbatim,
    /// Name rendered to title case for display uniformity.
    TitleCase,
    /// Currency token to decimal; unparseable amounts stay absent.
    Amount,
    /// Locale date parse against the provider's format list.
    Date,
}

/// A typed extracted value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Amount(Decimal),
    Date(NaiveDateTime),
}

/// One label/value pairing in a provider's rule table.
pub struct FieldRule {
    pub field: FieldKey,
    pub transform: Transform,
    label: Regex,
    value: Regex,
}

impl FieldRule {
    /// Compile a rule. Patterns live in static per-provider tables, so a
    /// malformed pattern is a programming error.
    pub fn new(field: FieldKey, label: &str, value: &str, transform: Transform) -> Self {
        Self {
            field,
            transform,
            label: Regex::new(label).unwrap(),
            value: Regex::new(value).unwrap(),
        }
    }
}

/// The labeled field set produced by a rule table.
#[derive(Debug, Default)]
pub struct ExtractedFields {
    values: HashMap<FieldKey, FieldValue>,
}

impl ExtractedFields {
    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    pub fn text(&self, key: FieldKey) -> Option<&str> {
        match self.values.get(&key) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn amount(&self, key: FieldKey) -> Option<Decimal> {
        match self.values.get(&key) {
            Some(FieldValue::Amount(d)) => Some(*d),
            _ => None,
        }
    }

    pub fn date(&self, key: FieldKey) -> Option<NaiveDateTime> {
        match self.values.get(&key) {
            Some(FieldValue::Date(d)) => Some(*d),
            _ => None,
        }
    }
}

/// Apply an ordered rule table to flattened receipt text.
///
/// `date_formats` is the provider's ordered list of chrono format strings
/// tried by `Transform::Date` rules.
pub fn apply_rules(
    rules: &[FieldRule],
    date_formats: &[&str],
    text: &RawText,
) -> ExtractedFields {
    let haystack = text.as_str();
    let mut fields = ExtractedFields::default();
    let mut cursor = 0usize;

    for rule in rules {
        // Prefer a match at or after the cursor (document order); fall
        // back to the whole text when a provider reorders sections.
        let label_match = rule
            .label
            .find_at(haystack, cursor)
            .or_else(|| rule.label.find(haystack));

        let Some(label) = label_match else {
            trace!(field = rule.field.name(), "label not found");
            continue;
        };

        let window_start = label.end();
        let window_end = next_label_start(rules, haystack, window_start);
        let window = &haystack[window_start..window_end];

        let Some(caps) = rule.value.captures(window) else {
            trace!(field = rule.field.name(), "value not found after label");
            continue;
        };
        let matched = caps.get(1).or_else(|| caps.get(0)).unwrap();
        let token = matched.as_str().trim();
        if token.is_empty() {
            continue;
        }

        let value = match rule.transform {
            Transform::Verbatim => Some(FieldValue::Text(token.to_string())),
            Transform::TitleCase => Some(FieldValue::Text(names::title_case(token))),
            Transform::Amount => amounts::parse_amount(token).map(FieldValue::Amount),
            Transform::Date => dates::parse_datetime(token, date_formats).map(FieldValue::Date),
        };

        if let Some(value) = value {
            trace!(field = rule.field.name(), ?value, "field extracted");
            fields.values.insert(rule.field, value);
            cursor = window_start + matched.end();
        }
    }

    fields
}

/// Earliest start of any rule label at or after `from`, bounding a value
/// window.
fn next_label_start(rules: &[FieldRule], haystack: &str, from: usize) -> usize {
    rules
        .iter()
        .filter_map(|r| r.label.find_at(haystack, from).map(|m| m.start()))
        .min()
        .unwrap_or(haystack.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn slip_rules() -> Vec<FieldRule> {
        vec![
            FieldRule::new(
                FieldKey::Payer,
                r"(?i)\bpayer\b",
                r"([A-Za-z][A-Za-z .'-]+)",
                Transform::TitleCase,
            ),
            FieldRule::new(
                FieldKey::PayerAccount,
                r"(?i)\baccount\b",
                r"([0-9A-Z*]{6,})",
                Transform::Verbatim,
            ),
            FieldRule::new(
                FieldKey::Receiver,
                r"(?i)\breceiver\b",
                r"([A-Za-z][A-Za-z .'-]+)",
                Transform::TitleCase,
            ),
            FieldRule::new(
                FieldKey::ReceiverAccount,
                r"(?i)\baccount\b",
                r"([0-9A-Z*]{6,})",
                Transform::Verbatim,
            ),
            FieldRule::new(
                FieldKey::Amount,
                r"(?i)transferred amount",
                r"([0-9][0-9,]*\.[0-9]{2})",
                Transform::Amount,
            ),
        ]
    }

    #[test]
    fn repeated_labels_resolve_in_order() {
        let text = RawText::from_text(
            "Payer ABEBE KEBEDE Account 1***1234 Receiver SELAM MARKET \
             Account 1***9876 Transferred Amount ETB 2,500.00",
        );
        let fields = apply_rules(&slip_rules(), &[], &text);

        assert_eq!(fields.text(FieldKey::Payer), Some("Abebe Kebede"));
        assert_eq!(fields.text(FieldKey::PayerAccount), Some("1***1234"));
        assert_eq!(fields.text(FieldKey::Receiver), Some("Selam Market"));
        assert_eq!(fields.text(FieldKey::ReceiverAccount), Some("1***9876"));
        assert_eq!(
            fields.amount(FieldKey::Amount),
            Some(Decimal::from_str("2500.00").unwrap())
        );
    }

    #[test]
    fn missing_label_leaves_field_absent() {
        let text = RawText::from_text("Payer ABEBE KEBEDE Transferred Amount ETB 100.00");
        let fields = apply_rules(&slip_rules(), &[], &text);

        assert_eq!(fields.text(FieldKey::Payer), Some("Abebe Kebede"));
        assert!(fields.get(FieldKey::Receiver).is_none());
        assert!(fields.get(FieldKey::ReceiverAccount).is_none());
        assert!(fields.amount(FieldKey::Amount).is_some());
    }

    #[test]
    fn value_window_stops_at_next_label() {
        // The payer name must not swallow the following Account label.
        let text = RawText::from_text("Payer Sara Tesfaye Account 100012345678");
        let fields = apply_rules(&slip_rules(), &[], &text);
        assert_eq!(fields.text(FieldKey::Payer), Some("Sara Tesfaye"));
    }

    #[test]
    fn unparseable_amount_is_absent_not_zero() {
        let rules = vec![FieldRule::new(
            FieldKey::Amount,
            r"(?i)amount",
            r"([^ ]+)",
            Transform::Amount,
        )];
        let text = RawText::from_text("Amount N/A");
        let fields = apply_rules(&rules, &[], &text);
        assert!(fields.get(FieldKey::Amount).is_none());
    }
}
