//! Document-native PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::RawText;
use crate::error::{Result, VerifyError};

/// Extract the flattened text of a PDF receipt.
///
/// The document is parsed page by page; page texts are concatenated with
/// single-space separators and whitespace-normalized. Receipts encrypted
/// with an empty owner password (some bank slips are) are decrypted
/// transparently.
pub fn extract_text(bytes: &[u8]) -> Result<RawText> {
    let raw = prepare(bytes)?;
    let text = pdf_extract::extract_text_from_mem(&raw)
        .map_err(|e| VerifyError::ExtractionFailed(format!("PDF text extraction: {e}")))?;

    let flat = RawText::from_text(&text);
    if flat.is_empty() {
        return Err(VerifyError::ExtractionFailed(
            "PDF contains no extractable text".to_string(),
        ));
    }
    Ok(flat)
}

/// Validate the PDF structure and return bytes suitable for text
/// extraction, decrypting empty-password documents along the way.
fn prepare(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|e| VerifyError::ExtractionFailed(format!("PDF parse: {e}")))?;

    let page_count = doc.get_pages().len();
    if page_count == 0 {
        return Err(VerifyError::ExtractionFailed("PDF has no pages".to_string()));
    }
    debug!("Loaded PDF with {} pages", page_count);

    if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            return Err(VerifyError::ExtractionFailed(
                "PDF is encrypted".to_string(),
            ));
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| VerifyError::ExtractionFailed(format!("saving decrypted PDF: {e}")))?;
        return Ok(decrypted);
    }

    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_extraction_failures() {
        let err = extract_text(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, VerifyError::ExtractionFailed(_)));
    }

    #[test]
    fn empty_input_is_an_extraction_failure() {
        assert!(extract_text(&[]).is_err());
    }
}
