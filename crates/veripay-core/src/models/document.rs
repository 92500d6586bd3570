//! The provider's receipt after transport-level retrieval.

use chrono::{DateTime, Utc};

/// Content kind of a fetched receipt document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A PDF body (direct download or captured browser response).
    Pdf,
    /// Visible text of a rendered receipt page, stored as UTF-8 bytes.
    RenderedPage,
    /// A raster image (uploaded receipts only; providers never serve one).
    Image,
}

/// A receipt retrieved through a provider's transport.
///
/// Owned by the adapter invocation that produced it and discarded after
/// text extraction; nothing in this subsystem persists it.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Raw document bytes.
    pub bytes: Vec<u8>,
    /// Declared content kind.
    pub kind: DocumentKind,
    /// URL the document was retrieved from.
    pub source_url: String,
    /// Retrieval timestamp.
    pub fetched_at: DateTime<Utc>,
}

impl FetchedDocument {
    pub fn new(bytes: Vec<u8>, kind: DocumentKind, source_url: impl Into<String>) -> Self {
        Self {
            bytes,
            kind,
            source_url: source_url.into(),
            fetched_at: Utc::now(),
        }
    }

    /// A rendered-page document from already-captured visible text.
    pub fn from_page_text(text: String, source_url: impl Into<String>) -> Self {
        Self::new(text.into_bytes(), DocumentKind::RenderedPage, source_url)
    }
}
