//! Bank of Abyssinia adapter data.
//!
//! The slip page is a client-rendered table, so a plain GET returns an
//! empty shell. Acquisition goes through the rendering engine and takes
//! the visible page text once the slip table is present. The endpoint
//! keys the slip on the reference concatenated with the trailing digits
//! of the receiving account.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Acquisition, InputContract, ProviderSpec};
use crate::config::EndpointConfig;
use crate::models::Provider;
use crate::rules::{FieldKey, FieldRule, Transform};
use crate::text::OcrLanguages;

lazy_static! {
    /// Core-banking references: FT then ten alphanumerics.
    static ref REFERENCE: Regex = Regex::new(r"\bFT[A-Z0-9]{10}\b").unwrap();
}

const MANDATORY: &[FieldKey] = &[
    FieldKey::Reference,
    FieldKey::Amount,
    FieldKey::Payer,
    FieldKey::Receiver,
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S", "%Y-%m-%d"];

const NAME: &str = r"([A-Za-z][A-Za-z .'-]+)";
const ACCOUNT: &str = r"([0-9A-Z*]{6,})";
const MONEY: &str = r"([0-9][0-9,]*\.[0-9]{2})";

pub(super) fn spec() -> ProviderSpec {
    ProviderSpec {
        provider: Provider::Abyssinia,
        contract: InputContract {
            requires_suffix: true,
        },
        acquisition: Acquisition::BrowserPageText {
            wait_selector: Some("table"),
        },
        reference_pattern: &REFERENCE,
        mandatory: MANDATORY,
        date_formats: DATE_FORMATS,
        ocr_languages: OcrLanguages::Latin,
        rules: rules(),
        url_builder: receipt_url,
    }
}

fn receipt_url(endpoints: &EndpointConfig, reference: &str, suffix: Option<&str>) -> String {
    format!(
        "{}/slip/?trx={}{}",
        endpoints.abyssinia.trim_end_matches('/'),
        reference,
        suffix.unwrap_or("")
    )
}

fn rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(
            FieldKey::PayerAccount,
            r"(?i)source\s*account",
            ACCOUNT,
            Transform::Verbatim,
        ),
        FieldRule::new(
            FieldKey::Payer,
            r"(?i)sender\s*name",
            NAME,
            Transform::TitleCase,
        ),
        FieldRule::new(
            FieldKey::Receiver,
            r"(?i)receiver\s*name",
            NAME,
            Transform::TitleCase,
        ),
        FieldRule::new(
            FieldKey::ReceiverAccount,
            r"(?i)receiver\s*account",
            ACCOUNT,
            Transform::Verbatim,
        ),
        FieldRule::new(
            FieldKey::Amount,
            r"(?i)transferred\s*amount",
            MONEY,
            Transform::Amount,
        ),
        FieldRule::new(
            FieldKey::Date,
            r"(?i)transaction\s*date",
            r"([0-9]{2,4}[-/][0-9]{1,2}[-/][0-9]{2,4}(?:\s+[0-9]{1,2}:[0-9]{2}:[0-9]{2})?)",
            Transform::Date,
        ),
        FieldRule::new(
            FieldKey::Reference,
            r"(?i)transaction\s*reference",
            r"([A-Z0-9]{8,16})",
            Transform::Verbatim,
        ),
        FieldRule::new(
            FieldKey::Reason,
            r"(?i)narrative|reason",
            r"([A-Za-z][A-Za-z0-9 .'-]*)",
            Transform::Verbatim,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::apply_rules;
    use crate::text::RawText;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    /// Visible text of a rendered Abyssinia slip table.
    const FIXTURE: &str = "Bank of Abyssinia Transaction Slip \
        Source Account 2***9012 \
        Sender Name ABEBE KEBEDE \
        Receiver Name SELAM MARKET \
        Receiver Account 3***3456 \
        Transferred Amount 1,000.00 \
        Transaction Date 2024-06-21 13:25:45 \
        Transaction Reference FT24172XYZAB \
        Narrative Rent June";

    #[test]
    fn slip_fixture_extracts_all_fields() {
        let fields = apply_rules(&rules(), DATE_FORMATS, &RawText::from_text(FIXTURE));

        assert_eq!(fields.text(FieldKey::PayerAccount), Some("2***9012"));
        assert_eq!(fields.text(FieldKey::Payer), Some("Abebe Kebede"));
        assert_eq!(fields.text(FieldKey::Receiver), Some("Selam Market"));
        assert_eq!(fields.text(FieldKey::ReceiverAccount), Some("3***3456"));
        assert_eq!(fields.text(FieldKey::Reference), Some("FT24172XYZAB"));
        assert_eq!(fields.text(FieldKey::Reason), Some("Rent June"));
        assert_eq!(
            fields.amount(FieldKey::Amount),
            Some(Decimal::from_str("1000.00").unwrap())
        );
        let date = fields.date(FieldKey::Date).unwrap();
        assert_eq!(date.to_string(), "2024-06-21 13:25:45");
    }

    #[test]
    fn date_is_not_mandatory_here() {
        assert!(!MANDATORY.contains(&FieldKey::Date));
    }

    #[test]
    fn receipt_url_appends_suffix_to_query() {
        let endpoints = EndpointConfig::default();
        assert_eq!(
            receipt_url(&endpoints, "FT24172XYZAB", Some("3456")),
            "https://cs.bankofabyssinia.com/slip/?trx=FT24172XYZAB3456"
        );
    }
}
