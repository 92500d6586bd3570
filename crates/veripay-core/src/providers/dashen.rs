//! Dashen Bank super-app adapter data.
//!
//! The receipt page only produces a PDF after client-side script runs,
//! so acquisition goes through the rendering engine: the pipeline
//! watches network traffic for an `application/pdf` response and falls
//! back to clicking the download control.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Acquisition, InputContract, ProviderSpec};
use crate::config::EndpointConfig;
use crate::models::Provider;
use crate::rules::{FieldKey, FieldRule, Transform};
use crate::text::OcrLanguages;

lazy_static! {
    /// Super-app references: DB then ten alphanumerics.
    static ref REFERENCE: Regex = Regex::new(r"\bDB[A-Z0-9]{10}\b").unwrap();
}

const MANDATORY: &[FieldKey] = &[FieldKey::Reference, FieldKey::Amount, FieldKey::Date];

const DATE_FORMATS: &[&str] = &["%d-%b-%Y %I:%M %p", "%d-%b-%Y %H:%M", "%d-%b-%Y"];

const NAME: &str = r"([A-Za-z][A-Za-z .'-]+)";
const ACCOUNT: &str = r"([0-9A-Z*]{6,})";
const MONEY: &str = r"([0-9][0-9,]*\.[0-9]{2})";

pub(super) fn spec() -> ProviderSpec {
    ProviderSpec {
        provider: Provider::Dashen,
        contract: InputContract {
            requires_suffix: false,
        },
        acquisition: Acquisition::BrowserPdfCapture {
            download_trigger: Some("a[download], button.download"),
        },
        reference_pattern: &REFERENCE,
        mandatory: MANDATORY,
        date_formats: DATE_FORMATS,
        ocr_languages: OcrLanguages::Latin,
        rules: rules(),
        url_builder: receipt_url,
    }
}

fn receipt_url(endpoints: &EndpointConfig, reference: &str, _suffix: Option<&str>) -> String {
    format!(
        "{}/receipt/{}",
        endpoints.dashen.trim_end_matches('/'),
        reference
    )
}

fn rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(
            FieldKey::Payer,
            r"(?i)sender\s*name",
            NAME,
            Transform::TitleCase,
        ),
        FieldRule::new(
            FieldKey::PayerAccount,
            r"(?i)sender\s*account",
            ACCOUNT,
            Transform::Verbatim,
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
            FieldKey::Date,
            r"(?i)transaction\s*date",
            r"([0-9]{1,2}-[A-Za-z]{3}-[0-9]{4}(?:\s+[0-9]{1,2}:[0-9]{2}\s*(?:AM|PM)?)?)",
            Transform::Date,
        ),
        FieldRule::new(
            FieldKey::Reference,
            r"(?i)transaction\s*reference",
            r"([A-Z0-9]{8,16})",
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
            r"(?i)service\s*charge",
            MONEY,
            Transform::Amount,
        ),
        FieldRule::new(FieldKey::Vat, r"(?i)\bvat\b", MONEY, Transform::Amount),
        FieldRule::new(
            FieldKey::TotalAmount,
            r"(?i)total\s*amount",
            MONEY,
            Transform::Amount,
        ),
        FieldRule::new(
            FieldKey::Reason,
            r"(?i)narrative|reason",
            r"([A-Za-z][A-Za-z0-9 .'-]*)",
            Transform::Verbatim,
        ),
    ]
}
