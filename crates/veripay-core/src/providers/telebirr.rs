//! telebirr (Ethio Telecom mobile money) adapter data.
//!
//! The receipt is a server-rendered HTML page keyed by the receipt
//! number. Labels are printed as Amharic/English pairs, so the rule
//! patterns anchor on the English half and the value patterns pick the
//! Latin token out of mixed-script windows.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Acquisition, InputContract, ProviderSpec};
use crate::config::EndpointConfig;
use crate::models::Provider;
use crate::rules::{FieldKey, FieldRule, Transform};
use crate::text::OcrLanguages;

lazy_static! {
    /// Receipt numbers: two letters then eight alphanumerics.
    static ref REFERENCE: Regex = Regex::new(r"\b[A-Z]{2}[A-Z0-9]{8}\b").unwrap();
}

const MANDATORY: &[FieldKey] = &[
    FieldKey::Reference,
    FieldKey::Amount,
    FieldKey::Date,
    FieldKey::Payer,
    FieldKey::Receiver,
];

const DATE_FORMATS: &[&str] = &["%d-%m-%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S", "%d-%m-%Y"];

const NAME: &str = r"([A-Za-z][A-Za-z .'-]+)";
const MONEY: &str = r"([0-9][0-9,]*(?:\.[0-9]{1,2})?)";

pub(super) fn spec() -> ProviderSpec {
    ProviderSpec {
        provider: Provider::Telebirr,
        contract: InputContract {
            requires_suffix: false,
        },
        acquisition: Acquisition::DirectPage,
        reference_pattern: &REFERENCE,
        mandatory: MANDATORY,
        date_formats: DATE_FORMATS,
        ocr_languages: OcrLanguages::AmharicLatin,
        rules: rules(),
        url_builder: receipt_url,
    }
}

fn receipt_url(endpoints: &EndpointConfig, reference: &str, _suffix: Option<&str>) -> String {
    format!(
        "{}/receipt/{}",
        endpoints.telebirr.trim_end_matches('/'),
        reference
    )
}

fn rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(
            FieldKey::Payer,
            r"(?i)payer\s*name",
            NAME,
            Transform::TitleCase,
        ),
        FieldRule::new(
            FieldKey::PayerAccount,
            r"(?i)payer\s*telebirr\s*no\.?",
            r"([0-9*]{6,})",
            Transform::Verbatim,
        ),
        FieldRule::new(
            FieldKey::Receiver,
            r"(?i)credited\s*party\s*name",
            NAME,
            Transform::TitleCase,
        ),
        FieldRule::new(
            FieldKey::ReceiverAccount,
            r"(?i)credited\s*party\s*account\s*no\.?",
            r"([0-9A-Za-z*]{4,})",
            Transform::Verbatim,
        ),
        FieldRule::new(
            FieldKey::Date,
            r"(?i)payment\s*date",
            r"([0-9]{1,2}-[0-9]{1,2}-[0-9]{4}(?:\s+[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?)?)",
            Transform::Date,
        ),
        FieldRule::new(
            FieldKey::Reference,
            r"(?i)receipt\s*(?:no\.?|number)",
            r"([A-Z0-9]{8,12})",
            Transform::Verbatim,
        ),
        FieldRule::new(
            FieldKey::Amount,
            r"(?i)settled\s*amount",
            MONEY,
            Transform::Amount,
        ),
        FieldRule::new(
            FieldKey::ServiceCharge,
            r"(?i)service\s*fee",
            MONEY,
            Transform::Amount,
        ),
        FieldRule::new(
            FieldKey::Vat,
            r"(?i)vat(?:\s*\(15%\))?",
            MONEY,
            Transform::Amount,
        ),
        FieldRule::new(
            FieldKey::TotalAmount,
            r"(?i)total\s*paid\s*amount",
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

    /// Flattened text of a real-shaped bilingual telebirr receipt page.
    const FIXTURE: &str = "telebirr Transaction Receipt \
        የከፋይ ስም/Payer Name አበበ ከበደ/ABEBE KEBEDE \
        የከፋይ ቴሌብር ቁ./Payer telebirr no. 2519****1234 \
        የገንዘብ ተቀባይ ስም/Credited Party name SELAM MARKET \
        የገንዘብ ተቀባይ ቁ./Credited party account no 100***5678 \
        የክፍያ ቀን/Payment date 21-06-2024 13:25:45 \
        ቁጥር/Receipt No CEH2LB03XH \
        የክፍያው መጠን/Settled Amount 1,000.00 Birr \
        የአገልግሎት ክፍያ/Service fee 5.00 Birr \
        ቫት/VAT(15%) 0.75 Birr \
        ጠቅላላ የተከፈለ/Total Paid Amount 1,005.75 Birr";

    #[test]
    fn bilingual_fixture_extracts_all_fields() {
        let fields = apply_rules(&rules(), DATE_FORMATS, &RawText::from_text(FIXTURE));

        assert_eq!(fields.text(FieldKey::Payer), Some("Abebe Kebede"));
        assert_eq!(fields.text(FieldKey::PayerAccount), Some("2519****1234"));
        assert_eq!(fields.text(FieldKey::Receiver), Some("Selam Market"));
        assert_eq!(fields.text(FieldKey::ReceiverAccount), Some("100***5678"));
        assert_eq!(fields.text(FieldKey::Reference), Some("CEH2LB03XH"));
        assert_eq!(
            fields.amount(FieldKey::Amount),
            Some(Decimal::from_str("1000.00").unwrap())
        );
        assert_eq!(
            fields.amount(FieldKey::ServiceCharge),
            Some(Decimal::from_str("5.00").unwrap())
        );
        assert_eq!(
            fields.amount(FieldKey::Vat),
            Some(Decimal::from_str("0.75").unwrap())
        );
        assert_eq!(
            fields.amount(FieldKey::TotalAmount),
            Some(Decimal::from_str("1005.75").unwrap())
        );
        let date = fields.date(FieldKey::Date).unwrap();
        assert_eq!(date.to_string(), "2024-06-21 13:25:45");
    }

    #[test]
    fn reference_pattern_finds_receipt_numbers() {
        assert!(REFERENCE.is_match("receipt CEH2LB03XH issued"));
        assert!(!REFERENCE.is_match("1234567890"));
    }

    #[test]
    fn receipt_url_shape() {
        let endpoints = EndpointConfig::default();
        assert_eq!(
            receipt_url(&endpoints, "CEH2LB03XH", None),
            "https://transactioninfo.ethiotelecom.et/receipt/CEH2LB03XH"
        );
    }
}
