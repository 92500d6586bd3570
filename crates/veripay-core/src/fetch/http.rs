//! Direct HTTPS acquisition for providers with plain receipt endpoints.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::error::{Result, VerifyError};
use crate::models::{DocumentKind, FetchedDocument};
use crate::text::html;

/// Download a receipt PDF from a direct endpoint.
///
/// Endpoints answer lookups for unknown references with an HTML error
/// page instead of a 404, so the body is checked for the PDF magic
/// before it is accepted.
pub async fn fetch_pdf(
    http: &HttpConfig,
    url: &str,
    accept_invalid_certs: bool,
) -> Result<FetchedDocument> {
    let bytes = get_bytes(http, url, accept_invalid_certs).await?;

    if !bytes.starts_with(b"%PDF") {
        return Err(VerifyError::DocumentNotAvailable(format!(
            "endpoint did not return a PDF for {url}"
        )));
    }

    Ok(FetchedDocument::new(bytes, DocumentKind::Pdf, url))
}

/// Download a server-rendered receipt page and reduce it to visible text.
pub async fn fetch_page(http: &HttpConfig, url: &str) -> Result<FetchedDocument> {
    let bytes = get_bytes(http, url, false).await?;
    let text = html::visible_text(&String::from_utf8_lossy(&bytes));

    if text.is_empty() {
        return Err(VerifyError::DocumentNotAvailable(format!(
            "receipt page at {url} has no visible text"
        )));
    }

    Ok(FetchedDocument::from_page_text(
        text.as_str().to_string(),
        url,
    ))
}

async fn get_bytes(http: &HttpConfig, url: &str, accept_invalid_certs: bool) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(http.timeout_secs))
        .user_agent(&http.user_agent)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(|e| VerifyError::Transport(format!("building HTTP client: {e}")))?;

    let attempts = http.retries + 1;
    let mut last_err = None;

    for attempt in 1..=attempts {
        match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    return Err(VerifyError::DocumentNotAvailable(format!(
                        "endpoint answered {status} for {url}"
                    )));
                }
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| VerifyError::Transport(format!("reading body: {e}")))?;
                debug!(len = body.len(), attempt, "Downloaded receipt body");
                return Ok(body.to_vec());
            }
            Err(e) if e.is_timeout() => {
                // A quiet endpoint means the receipt is not there yet.
                return Err(VerifyError::DocumentNotAvailable(format!(
                    "request to {url} timed out"
                )));
            }
            Err(e) => {
                warn!(attempt, attempts, error = %e, "Receipt request failed");
                last_err = Some(e);
            }
        }
    }

    Err(VerifyError::Transport(format!(
        "request to {url} failed after {attempts} attempts: {}",
        last_err.map(|e| e.to_string()).unwrap_or_default()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_http() -> HttpConfig {
        HttpConfig {
            timeout_secs: 2,
            retries: 0,
            ..HttpConfig::default()
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Port 1 on loopback refuses connections immediately.
        let err = fetch_page(&test_http(), "http://127.0.0.1:1/receipt/ABC")
            .await
            .unwrap_err();
        assert!(matches!(err, VerifyError::Transport(_)), "{err}");
    }

    #[tokio::test]
    async fn silent_endpoint_times_out_as_document_not_available() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept the connection and never answer.
            let _socket = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let http = HttpConfig {
            timeout_secs: 1,
            retries: 0,
            ..HttpConfig::default()
        };
        let err = fetch_page(&http, &format!("http://{addr}/receipt/X"))
            .await
            .unwrap_err();
        assert!(matches!(err, VerifyError::DocumentNotAvailable(_)), "{err}");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error_for_pdf() {
        let err = fetch_pdf(&test_http(), "http://127.0.0.1:1/?id=FT1", false)
            .await
            .unwrap_err();
        assert!(matches!(err, VerifyError::Transport(_)), "{err}");
    }
}
