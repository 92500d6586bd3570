//! The verification pipeline.
//!
//! Drives one request through the fixed state flow: input validation,
//! reference resolution, acquisition, text extraction, rule application,
//! and normalization. Every failure is a classified [`VerifyError`]; the
//! public entry point folds it into a uniform [`VerificationResult`].

use tracing::{info, instrument, warn};

use crate::config::VeripayConfig;
use crate::error::{Result, VerifyError};
use crate::fetch;
use crate::models::{Receipt, VerificationRequest, VerificationResult};
use crate::normalize;
use crate::providers::{spec_for, ProviderSpec};
use crate::resolver;
use crate::rules::apply_rules;
use crate::text;

/// Receipt verifier bound to one configuration.
///
/// Holds no connection state; each verification builds and tears down its
/// own transport, so one `Verifier` serves concurrent requests.
pub struct Verifier {
    config: VeripayConfig,
}

impl Verifier {
    pub fn new(config: VeripayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VeripayConfig {
        &self.config
    }

    /// Verify a payment receipt.
    ///
    /// Always returns a result; failures are folded in as classified
    /// errors rather than propagated.
    #[instrument(skip(self, request), fields(provider = %request.provider))]
    pub async fn verify(&self, request: &VerificationRequest) -> VerificationResult {
        match self.run(request).await {
            Ok(receipt) => {
                info!(reference = ?receipt.reference, "Verification succeeded");
                VerificationResult::verified(receipt)
            }
            Err(error) => {
                warn!(%error, kind = ?error.kind(), "Verification failed");
                VerificationResult::failed(&error)
            }
        }
    }

    /// Resolve the reference only, without acquiring the receipt.
    ///
    /// Useful when a caller holds a receipt file and wants the reference
    /// for its own records.
    pub fn resolve_reference(&self, request: &VerificationRequest) -> Result<String> {
        request.validate()?;
        let spec = spec_for(request.provider);
        resolved_reference(request, spec, &self.config)
    }

    async fn run(&self, request: &VerificationRequest) -> Result<Receipt> {
        request.validate()?;
        let spec = spec_for(request.provider);

        // The input contract fails before any I/O budget is spent.
        spec.contract.check(request.provider, request)?;

        let reference = resolved_reference(request, spec, &self.config)?;

        let document = fetch::acquire(
            spec,
            &self.config,
            &reference,
            request.account_suffix.as_deref(),
        )
        .await?;

        let raw_text = text::extract(&document)?;
        let fields = apply_rules(spec.rules(), spec.date_formats, &raw_text);
        normalize::build_receipt(spec, &fields)
    }
}

/// An explicit caller-supplied reference always wins over file recovery.
fn resolved_reference(
    request: &VerificationRequest,
    spec: &ProviderSpec,
    config: &VeripayConfig,
) -> Result<String> {
    if let Some(reference) = request.reference.as_deref() {
        let reference = reference.trim();
        if !reference.is_empty() {
            return Ok(reference.to_string());
        }
    }

    let file = request
        .file
        .as_ref()
        .ok_or_else(|| VerifyError::MissingInput("no reference and no receipt file".to_string()))?;
    resolver::resolve_from_file(file, spec, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileKind, Provider, UploadedFile};

    fn verifier() -> Verifier {
        Verifier::new(VeripayConfig::default())
    }

    #[tokio::test]
    async fn empty_request_fails_without_any_io() {
        let request = VerificationRequest {
            provider: Provider::Telebirr,
            reference: None,
            account_suffix: None,
            file: None,
        };
        let result = verifier().verify(&request).await;
        assert!(!result.success);
        assert_eq!(
            result.error_kind,
            Some(crate::error::ErrorKind::MissingInput)
        );
    }

    #[tokio::test]
    async fn suffix_contract_is_checked_before_acquisition() {
        let request = VerificationRequest::by_reference(Provider::Cbe, "FT24172ABCDE");
        let result = verifier().verify(&request).await;
        assert!(!result.success);
        assert_eq!(
            result.error_kind,
            Some(crate::error::ErrorKind::MissingInput)
        );
        assert!(result.error.unwrap().contains("accountSuffix"));
    }

    #[test]
    fn explicit_reference_wins_over_file_recovery() {
        // The file bytes are garbage; if recovery ran it would fail, so a
        // successful resolve proves the explicit reference took priority.
        let mut request = VerificationRequest::by_reference(Provider::Cbe, "FT24172ABCDE");
        request.file = Some(UploadedFile {
            bytes: vec![0, 1, 2, 3],
            kind: FileKind::Pdf,
        });

        let reference = verifier().resolve_reference(&request).unwrap();
        assert_eq!(reference, "FT24172ABCDE");
    }

    #[test]
    fn garbage_pdf_upload_fails_extraction() {
        let request =
            VerificationRequest::by_file(Provider::Cbe, vec![0, 1, 2, 3], FileKind::Pdf);
        let err = verifier().resolve_reference(&request).unwrap_err();
        assert!(matches!(err, VerifyError::ExtractionFailed(_)), "{err}");
    }
}
