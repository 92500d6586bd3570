//! Text extraction strategies.
//!
//! Three strategies (document-native PDF, rendered-page, OCR) all converge
//! on the same flattened [`RawText`] shape so field extraction never
//! branches on extraction origin.

pub mod html;
#[cfg(feature = "ocr")]
pub mod ocr;
pub mod pdf;

use crate::error::Result;
use crate::models::{DocumentKind, FetchedDocument};

/// Language set an OCR pass is configured for.
///
/// Providers operating in a bilingual locale print Amharic/English label
/// pairs, so their uploads need the combined recognition model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrLanguages {
    Latin,
    AmharicLatin,
}

/// Flattened, whitespace-normalized receipt text.
///
/// Always a single string; page boundaries survive only as separators
/// because the field-extraction rules operate on the flattened stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText(String);

impl RawText {
    /// Build from arbitrary text, normalizing whitespace.
    pub fn from_text(text: &str) -> Self {
        Self(normalize_whitespace(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for RawText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract text from a provider-fetched document.
///
/// Image documents never come from a provider transport; they only enter
/// through uploads, which the reference resolver OCRs directly.
pub fn extract(document: &FetchedDocument) -> Result<RawText> {
    match document.kind {
        DocumentKind::Pdf => pdf::extract_text(&document.bytes),
        DocumentKind::RenderedPage => {
            let text = String::from_utf8_lossy(&document.bytes);
            Ok(RawText::from_text(&text))
        }
        DocumentKind::Image => Err(crate::error::VerifyError::ExtractionFailed(
            "image documents are only supported via upload".to_string(),
        )),
    }
}

/// Collapse all whitespace runs (including non-breaking spaces) to single
/// spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = true;
    for c in text.chars() {
        if c.is_whitespace() || c == '\u{00a0}' {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}
