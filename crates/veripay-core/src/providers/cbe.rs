//! Commercial Bank of Ethiopia adapter data.
//!
//! CBE serves the receipt as a PDF from a direct endpoint keyed by the
//! reference concatenated with the trailing digits of the receiving
//! account. The endpoint's TLS chain is misconfigured, so certificate
//! validation is relaxed for this provider's calls only.

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
    FieldKey::Date,
    FieldKey::Payer,
    FieldKey::Receiver,
];

const DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%d/%m/%y %H:%M",
    "%m/%d/%Y",
];

const NAME: &str = r"([A-Za-z][A-Za-z .'-]+)";
const ACCOUNT: &str = r"([0-9A-Z*]{6,})";
const MONEY: &str = r"([0-9][0-9,]*\.[0-9]{2})";

pub(super) fn spec() -> ProviderSpec {
    ProviderSpec {
        provider: Provider::Cbe,
        contract: InputContract {
            requires_suffix: true,
        },
        acquisition: Acquisition::DirectPdf {
            accept_invalid_certs: true,
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
        "{}/?id={}{}",
        endpoints.cbe.trim_end_matches('/'),
        reference,
        suffix.unwrap_or("")
    )
}

fn rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(FieldKey::Payer, r"(?i)\bpayer\b", NAME, Transform::TitleCase),
        FieldRule::new(
            FieldKey::PayerAccount,
            r"(?i)\baccount\b",
            ACCOUNT,
            Transform::Verbatim,
        ),
        FieldRule::new(
            FieldKey::Receiver,
            r"(?i)\breceiver\b",
            NAME,
            Transform::TitleCase,
        ),
        FieldRule::new(
            FieldKey::ReceiverAccount,
            r"(?i)\baccount\b",
            ACCOUNT,
            Transform::Verbatim,
        ),
        FieldRule::new(
            FieldKey::Date,
            r"(?i)payment\s*date\s*&\s*time",
            r"([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4},?\s*[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?\s*(?:AM|PM)?)",
            Transform::Date,
        ),
        FieldRule::new(
            FieldKey::Reference,
            r"(?i)reference\s*no\.?\s*(?:\(vat\s*invoice\s*no\.?\))?",
            r"([A-Z0-9]{8,16})",
            Transform::Verbatim,
        ),
        FieldRule::new(
            FieldKey::Reason,
            r"(?i)reason\s*/\s*type\s*of\s*service",
            r"(.+)",
            Transform::Verbatim,
        ),
        FieldRule::new(
            FieldKey::Amount,
            r"(?i)transferred\s*amount",
            MONEY,
            Transform::Amount,
        ),
        FieldRule::new(
            FieldKey::ServiceCharge,
            r"(?i)commission\s*or\s*service\s*charge",
            MONEY,
            Transform::Amount,
        ),
        FieldRule::new(
            FieldKey::Vat,
            r"(?i)15%\s*vat\s*on\s*commission",
            MONEY,
            Transform::Amount,
        ),
        // The full phrase is part of the label so the trailing word
        // "account" is not mistaken for the account label.
        FieldRule::new(
            FieldKey::TotalAmount,
            r"(?i)total\s*amount\s*debited(?:\s*from\s*customers?\s*account)?",
            MONEY,
            Transform::Amount,
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

    /// Flattened text of a CBE customer receipt PDF.
    const FIXTURE: &str = "Commercial Bank of Ethiopia Customer Receipt \
        Payer ABEBE KEBEDE Account 1****1234 \
        Receiver SELAM MARKET PLC Account 1****5678 \
        Payment Date & Time 6/21/2024, 1:25:00 PM \
        Reference No. (VAT Invoice No) FT24172ABCDE \
        Reason / Type of service Transfer to Selam \
        Transferred Amount 1,000.00 ETB \
        Commission or Service Charge 0.00 ETB \
        15% VAT on Commission 0.00 ETB \
        Total amount debited from customers account 1,000.00 ETB";

    #[test]
    fn slip_fixture_extracts_all_fields() {
        let fields = apply_rules(&rules(), DATE_FORMATS, &RawText::from_text(FIXTURE));

        assert_eq!(fields.text(FieldKey::Payer), Some("Abebe Kebede"));
        assert_eq!(fields.text(FieldKey::PayerAccount), Some("1****1234"));
        assert_eq!(fields.text(FieldKey::Receiver), Some("Selam Market Plc"));
        assert_eq!(fields.text(FieldKey::ReceiverAccount), Some("1****5678"));
        assert_eq!(fields.text(FieldKey::Reference), Some("FT24172ABCDE"));
        assert_eq!(fields.text(FieldKey::Reason), Some("Transfer to Selam"));
        assert_eq!(
            fields.amount(FieldKey::Amount),
            Some(Decimal::from_str("1000.00").unwrap())
        );
        assert_eq!(
            fields.amount(FieldKey::TotalAmount),
            Some(Decimal::from_str("1000.00").unwrap())
        );
        let date = fields.date(FieldKey::Date).unwrap();
        assert_eq!(date.to_string(), "2024-06-21 13:25:00");
    }

    #[test]
    fn masked_accounts_are_preserved_verbatim() {
        let fields = apply_rules(&rules(), DATE_FORMATS, &RawText::from_text(FIXTURE));
        assert_eq!(fields.text(FieldKey::PayerAccount), Some("1****1234"));
    }

    #[test]
    fn reference_pattern_shape() {
        assert!(REFERENCE.is_match("ref FT24172ABCDE done"));
        assert!(!REFERENCE.is_match("FT1234"));
    }

    #[test]
    fn receipt_url_appends_suffix() {
        let endpoints = EndpointConfig::default();
        assert_eq!(
            receipt_url(&endpoints, "FT24172ABCDE", Some("12345678")),
            "https://apps.cbe.com.et:100/?id=FT24172ABCDE12345678"
        );
    }
}
