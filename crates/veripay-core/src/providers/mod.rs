//! Provider adapter registry and dispatch.
//!
//! One record per provider holds everything provider-specific as data:
//! the minimum input contract, the reference shape, the acquisition
//! descriptor (URL builder, transport, TLS policy, selectors), the date
//! format list, the OCR language set, the field rule table, and the
//! mandatory-field subset. Adding or removing a provider is a single
//! table edit. The registry is immutable after initialization and safe
//! to read from concurrent requests.

pub mod abyssinia;
pub mod cbe;
pub mod dashen;
pub mod telebirr;

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::EndpointConfig;
use crate::error::{Result, VerifyError};
use crate::models::{Provider, VerificationRequest};
use crate::rules::{FieldKey, FieldRule};
use crate::text::OcrLanguages;

/// How a provider's receipt document is acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// Plain HTTPS request returning a PDF body.
    ///
    /// `accept_invalid_certs` relaxes TLS validation for this call only;
    /// some banks serve receipts from hosts with broken chains.
    DirectPdf { accept_invalid_certs: bool },

    /// Plain HTTPS request returning a server-rendered receipt page; the
    /// page's visible text is the document payload.
    DirectPage,

    /// A rendering engine loads the receipt URL and the pipeline captures
    /// the network response whose content type indicates a PDF. If
    /// nothing arrives, `download_trigger` (a CSS selector) is clicked to
    /// provoke the download.
    BrowserPdfCapture { download_trigger: Option<&'static str> },

    /// A rendering engine loads the receipt URL and the rendered page's
    /// visible text is captured directly.
    BrowserPageText { wait_selector: Option<&'static str> },
}

/// Minimum input a provider needs before any acquisition is attempted.
#[derive(Debug, Clone, Copy)]
pub struct InputContract {
    /// The provider's endpoint needs an account suffix besides the
    /// reference.
    pub requires_suffix: bool,
}

impl InputContract {
    /// Fail fast with `MissingInput` before any I/O budget is spent.
    pub fn check(&self, provider: Provider, request: &VerificationRequest) -> Result<()> {
        if self.requires_suffix {
            let has_suffix = request
                .account_suffix
                .as_deref()
                .map(|s| !s.trim().is_empty())
                .unwrap_or(false);
            if !has_suffix {
                return Err(VerifyError::MissingInput(format!(
                    "{provider} requires the receiving account suffix (accountSuffix)"
                )));
            }
        }
        Ok(())
    }
}

/// The per-provider configuration record.
pub struct ProviderSpec {
    pub provider: Provider,
    pub contract: InputContract,
    pub acquisition: Acquisition,
    /// Shape of this provider's transaction references, used to recover a
    /// reference from uploaded documents.
    pub reference_pattern: &'static Regex,
    /// Canonical fields that must be present for the result to count as
    /// verified.
    pub mandatory: &'static [FieldKey],
    /// Ordered chrono formats for this provider's printed dates.
    pub date_formats: &'static [&'static str],
    /// OCR models needed for this provider's uploaded images.
    pub ocr_languages: OcrLanguages,
    rules: Vec<FieldRule>,
    url_builder: fn(&EndpointConfig, &str, Option<&str>) -> String,
}

impl ProviderSpec {
    /// The provider's ordered field-extraction rule table.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Build the receipt URL for a reference (+ suffix where required).
    pub fn receipt_url(
        &self,
        endpoints: &EndpointConfig,
        reference: &str,
        suffix: Option<&str>,
    ) -> String {
        (self.url_builder)(endpoints, reference, suffix)
    }
}

lazy_static! {
    static ref REGISTRY: HashMap<Provider, ProviderSpec> = {
        let mut map = HashMap::new();
        map.insert(Provider::Telebirr, telebirr::spec());
        map.insert(Provider::Cbe, cbe::spec());
        map.insert(Provider::Dashen, dashen::spec());
        map.insert(Provider::Abyssinia, abyssinia::spec());
        map
    };
}

/// Look up the adapter record for a provider.
///
/// The provider set is closed, so every enum value has a record; a panic
/// here would mean the table above is out of sync with the enum.
pub fn spec_for(provider: Provider) -> &'static ProviderSpec {
    REGISTRY
        .get(&provider)
        .expect("provider registry covers the closed provider set")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileKind;

    #[test]
    fn registry_covers_every_provider() {
        for provider in Provider::ALL {
            let spec = spec_for(provider);
            assert_eq!(spec.provider, provider);
            assert!(!spec.mandatory.is_empty());
            assert!(!spec.rules().is_empty());
        }
    }

    #[test]
    fn suffix_contract_fails_fast() {
        let spec = spec_for(Provider::Cbe);
        let request = VerificationRequest::by_reference(Provider::Cbe, "FT24172ABCDE");
        assert!(matches!(
            spec.contract.check(Provider::Cbe, &request),
            Err(VerifyError::MissingInput(_))
        ));

        let request = request.with_account_suffix("12345678");
        assert!(spec.contract.check(Provider::Cbe, &request).is_ok());
    }

    #[test]
    fn suffix_free_contract_accepts_file_only_requests() {
        let spec = spec_for(Provider::Telebirr);
        let request = VerificationRequest::by_file(Provider::Telebirr, vec![1], FileKind::Pdf);
        assert!(spec.contract.check(Provider::Telebirr, &request).is_ok());
    }

    #[test]
    fn every_mandatory_field_has_a_rule() {
        for provider in Provider::ALL {
            let spec = spec_for(provider);
            for field in spec.mandatory {
                assert!(
                    spec.rules().iter().any(|r| r.field == *field),
                    "{provider}: no rule for mandatory field {}",
                    field.name()
                );
            }
        }
    }
}
