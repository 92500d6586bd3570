//! Error types for the veripay-core library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the verification pipeline.
///
/// Every acquisition- or extraction-layer failure is converted into one of
/// these variants at the adapter boundary; no raw transport error crosses
/// into the result normalizer.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The request did not satisfy the provider's minimum input contract.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// The provider code is not part of the supported set.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// No transaction reference could be recovered from a supplied file.
    #[error("no transaction reference found in the supplied document")]
    ReferenceNotFound,

    /// Acquisition timed out or the provider reported no receipt.
    #[error("receipt not available: {0}")]
    DocumentNotAvailable(String),

    /// Text extraction itself failed (corrupt document, OCR failure).
    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),

    /// Mandatory canonical fields were missing after parsing.
    #[error("mandatory fields missing: {0}")]
    FieldsIncomplete(String),

    /// Network or TLS failure not otherwise classified.
    #[error("transport error: {0}")]
    Transport(String),
}

impl VerifyError {
    /// The machine-readable classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerifyError::MissingInput(_) => ErrorKind::MissingInput,
            VerifyError::UnsupportedProvider(_) => ErrorKind::UnsupportedProvider,
            VerifyError::ReferenceNotFound => ErrorKind::ReferenceNotFound,
            VerifyError::DocumentNotAvailable(_) => ErrorKind::DocumentNotAvailable,
            VerifyError::ExtractionFailed(_) => ErrorKind::ExtractionFailed,
            VerifyError::FieldsIncomplete(_) => ErrorKind::FieldsIncomplete,
            VerifyError::Transport(_) => ErrorKind::TransportError,
        }
    }
}

/// Machine-readable error classification exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingInput,
    UnsupportedProvider,
    ReferenceNotFound,
    DocumentNotAvailable,
    ExtractionFailed,
    FieldsIncomplete,
    TransportError,
}

/// Result type for the veripay-core library.
pub type Result<T> = std::result::Result<T, VerifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            VerifyError::MissingInput("reference".into()).kind(),
            ErrorKind::MissingInput
        );
        assert_eq!(VerifyError::ReferenceNotFound.kind(), ErrorKind::ReferenceNotFound);
        assert_eq!(
            VerifyError::Transport("connection refused".into()).kind(),
            ErrorKind::TransportError
        );
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::DocumentNotAvailable).unwrap();
        assert_eq!(json, "\"document_not_available\"");
    }
}
