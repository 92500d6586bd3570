//! Document acquisition.
//!
//! Turns a provider's acquisition descriptor plus a reference into a
//! [`FetchedDocument`]. Direct endpoints go through plain HTTPS; pages
//! that only materialize under script go through a headless browser
//! session. Callers never see transport errors, only the classified
//! error variants.

pub mod browser;
pub mod http;

use tracing::info;

use crate::config::VeripayConfig;
use crate::error::Result;
use crate::models::FetchedDocument;
use crate::providers::{Acquisition, ProviderSpec};

/// Retrieve the receipt document for a resolved reference.
pub async fn acquire(
    spec: &ProviderSpec,
    config: &VeripayConfig,
    reference: &str,
    suffix: Option<&str>,
) -> Result<FetchedDocument> {
    let url = spec.receipt_url(&config.endpoints, reference, suffix);
    info!(provider = %spec.provider, %url, "Acquiring receipt document");

    match spec.acquisition {
        Acquisition::DirectPdf {
            accept_invalid_certs,
        } => http::fetch_pdf(&config.http, &url, accept_invalid_certs).await,
        Acquisition::DirectPage => http::fetch_page(&config.http, &url).await,
        Acquisition::BrowserPdfCapture { download_trigger } => {
            browser::capture_pdf(&config.browser, &url, download_trigger).await
        }
        Acquisition::BrowserPageText { wait_selector } => {
            browser::capture_page_text(&config.browser, &url, wait_selector).await
        }
    }
}
