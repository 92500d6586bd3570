//! Transaction reference recovery from uploaded receipt documents.
//!
//! When a caller only has the receipt file, the reference is recovered by
//! extracting the file's text (native PDF text or OCR for images) and
//! scanning it with the provider's reference pattern. The first match in
//! document order wins; receipts print their own reference before any
//! cross-referenced transactions.

use tracing::{debug, info};

use crate::config::VeripayConfig;
use crate::error::{Result, VerifyError};
use crate::models::{FileKind, UploadedFile};
use crate::providers::ProviderSpec;
use crate::text::{pdf, RawText};

/// Recover the transaction reference from an uploaded document.
pub fn resolve_from_file(
    file: &UploadedFile,
    spec: &ProviderSpec,
    config: &VeripayConfig,
) -> Result<String> {
    let text = match file.kind {
        FileKind::Pdf => pdf::extract_text(&file.bytes)?,
        FileKind::Image => image_text(file, spec, config)?,
    };
    debug!(len = text.as_str().len(), "Extracted upload text");

    let reference = find_reference(&text, spec)?;
    info!(provider = %spec.provider, %reference, "Recovered reference from upload");
    Ok(reference)
}

/// Scan extracted text for the provider's reference shape.
pub fn find_reference(text: &RawText, spec: &ProviderSpec) -> Result<String> {
    spec.reference_pattern
        .find(text.as_str())
        .map(|m| m.as_str().to_string())
        .ok_or(VerifyError::ReferenceNotFound)
}

#[cfg(feature = "ocr")]
fn image_text(file: &UploadedFile, spec: &ProviderSpec, config: &VeripayConfig) -> Result<RawText> {
    let engine = crate::text::ocr::OcrEngine::from_config(&config.ocr, spec.ocr_languages)?;
    engine.extract_text(&file.bytes)
}

#[cfg(not(feature = "ocr"))]
fn image_text(
    _file: &UploadedFile,
    _spec: &ProviderSpec,
    _config: &VeripayConfig,
) -> Result<RawText> {
    Err(VerifyError::ExtractionFailed(
        "image uploads require the ocr feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Provider;
    use crate::providers::spec_for;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_reference_in_extracted_text() {
        let spec = spec_for(Provider::Cbe);
        let text = RawText::from_text("Receipt for transaction FT24172ABCDE issued 21/06/2024");
        assert_eq!(find_reference(&text, spec).unwrap(), "FT24172ABCDE");
    }

    #[test]
    fn first_match_in_document_order_wins() {
        let spec = spec_for(Provider::Cbe);
        let text = RawText::from_text("FT24172ABCDE replaces earlier FT24001ZZZZZ");
        assert_eq!(find_reference(&text, spec).unwrap(), "FT24172ABCDE");
    }

    #[test]
    fn missing_reference_is_classified() {
        let spec = spec_for(Provider::Telebirr);
        let text = RawText::from_text("no codes here, just words");
        assert!(matches!(
            find_reference(&text, spec),
            Err(VerifyError::ReferenceNotFound)
        ));
    }

    #[test]
    fn provider_patterns_do_not_cross_match() {
        // A Dashen reference must not satisfy the CBE shape.
        let spec = spec_for(Provider::Cbe);
        let text = RawText::from_text("Transaction DB24AB12CD34 completed");
        assert!(find_reference(&text, spec).is_err());
    }
}
