//! Verification request models.

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

/// The closed set of supported payment providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Ethio Telecom telebirr mobile money.
    Telebirr,
    /// Commercial Bank of Ethiopia.
    Cbe,
    /// Dashen Bank super app.
    Dashen,
    /// Bank of Abyssinia.
    Abyssinia,
}

impl Provider {
    /// All supported providers.
    pub const ALL: [Provider; 4] = [
        Provider::Telebirr,
        Provider::Cbe,
        Provider::Dashen,
        Provider::Abyssinia,
    ];

    /// Wire code for this provider.
    pub fn code(&self) -> &'static str {
        match self {
            Provider::Telebirr => "telebirr",
            Provider::Cbe => "cbe",
            Provider::Dashen => "dashen",
            Provider::Abyssinia => "abyssinia",
        }
    }

    /// Parse a provider code, failing with `UnsupportedProvider`.
    pub fn parse(code: &str) -> Result<Self, VerifyError> {
        match code.trim().to_ascii_lowercase().as_str() {
            "telebirr" => Ok(Provider::Telebirr),
            "cbe" => Ok(Provider::Cbe),
            "dashen" => Ok(Provider::Dashen),
            "abyssinia" | "boa" => Ok(Provider::Abyssinia),
            other => Err(VerifyError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Declared kind of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Image,
}

/// A caller-supplied receipt document, used for reference recovery.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Raw file bytes.
    pub bytes: Vec<u8>,
    /// Declared kind, required whenever bytes are present.
    pub kind: FileKind,
}

/// Input to the verification pipeline.
///
/// At least one of `reference` / `file` must be present; this is checked
/// at the boundary before any network I/O so downstream components never
/// re-validate optional-field presence.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    /// Target provider.
    pub provider: Provider,
    /// Transaction reference, if the caller knows it.
    pub reference: Option<String>,
    /// Provider-specific account suffix (e.g. trailing digits of the
    /// receiving account), where the provider's endpoint requires it.
    pub account_suffix: Option<String>,
    /// Previously obtained receipt document.
    pub file: Option<UploadedFile>,
}

impl VerificationRequest {
    /// A request identified by reference alone.
    pub fn by_reference(provider: Provider, reference: impl Into<String>) -> Self {
        Self {
            provider,
            reference: Some(reference.into()),
            account_suffix: None,
            file: None,
        }
    }

    /// A request identified by an uploaded document.
    pub fn by_file(provider: Provider, bytes: Vec<u8>, kind: FileKind) -> Self {
        Self {
            provider,
            reference: None,
            account_suffix: None,
            file: Some(UploadedFile { bytes, kind }),
        }
    }

    /// Attach an account suffix.
    pub fn with_account_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.account_suffix = Some(suffix.into());
        self
    }

    /// Boundary invariant: a reference or a file must be present.
    pub fn validate(&self) -> Result<(), VerifyError> {
        let has_reference = self
            .reference
            .as_deref()
            .map(|r| !r.trim().is_empty())
            .unwrap_or(false);
        if !has_reference && self.file.is_none() {
            return Err(VerifyError::MissingInput(
                "either a transaction reference or a receipt file is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_provider_codes() {
        assert_eq!(Provider::parse("telebirr").unwrap(), Provider::Telebirr);
        assert_eq!(Provider::parse("CBE").unwrap(), Provider::Cbe);
        assert_eq!(Provider::parse("boa").unwrap(), Provider::Abyssinia);
        assert!(matches!(
            Provider::parse("mpesa"),
            Err(VerifyError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn empty_request_rejected() {
        let request = VerificationRequest {
            provider: Provider::Telebirr,
            reference: None,
            account_suffix: None,
            file: None,
        };
        assert!(matches!(request.validate(), Err(VerifyError::MissingInput(_))));
    }

    #[test]
    fn blank_reference_counts_as_absent() {
        let mut request = VerificationRequest::by_reference(Provider::Cbe, "  ");
        assert!(request.validate().is_err());

        request.file = Some(UploadedFile {
            bytes: vec![1, 2, 3],
            kind: FileKind::Pdf,
        });
        assert!(request.validate().is_ok());
    }
}
