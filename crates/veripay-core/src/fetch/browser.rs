//! Browser-mediated acquisition for receipts that only exist after
//! client-side script runs.
//!
//! A headless Chromium session is launched per acquisition and torn down
//! on every exit path. PDF capture listens to network traffic for an
//! `application/pdf` response rather than driving the download manager;
//! page-text capture evaluates the rendered document's visible text.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventResponseReceived, GetResponseBodyParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::config::BrowserConfig;
use crate::error::{Result, VerifyError};
use crate::models::{DocumentKind, FetchedDocument};

/// Load `url` and capture the PDF the page produces.
///
/// If no PDF response arrives on its own, `download_trigger` (a CSS
/// selector) is clicked once to provoke it.
pub async fn capture_pdf(
    config: &BrowserConfig,
    url: &str,
    download_trigger: Option<&str>,
) -> Result<FetchedDocument> {
    let session = Session::launch(config).await?;
    let result = with_navigation_retries(config, || async {
        let page = session.new_page().await?;
        let outcome = capture_pdf_once(&page, config, url, download_trigger).await;
        let _ = page.close().await;
        outcome
    })
    .await;
    session.close().await;

    result.map(|bytes| FetchedDocument::new(bytes, DocumentKind::Pdf, url))
}

/// Load `url`, wait for the slip content to render, and capture the
/// page's visible text.
pub async fn capture_page_text(
    config: &BrowserConfig,
    url: &str,
    wait_selector: Option<&str>,
) -> Result<FetchedDocument> {
    let session = Session::launch(config).await?;
    let result = with_navigation_retries(config, || async {
        let page = session.new_page().await?;
        let outcome = page_text_once(&page, config, url, wait_selector).await;
        let _ = page.close().await;
        outcome
    })
    .await;
    session.close().await;

    result.map(|text| FetchedDocument::from_page_text(text, url))
}

/// One headless browser process plus its CDP event pump.
struct Session {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl Session {
    async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut builder = LaunchConfig::builder().no_sandbox();
        if let Some(path) = &config.executable {
            builder = builder.chrome_executable(path);
        }
        let launch = builder.build().map_err(VerifyError::Transport)?;

        let (browser, mut handler) = Browser::launch(launch)
            .await
            .map_err(|e| VerifyError::Transport(format!("launching browser: {e}")))?;

        // The handler must be polled for the whole session or every CDP
        // call stalls.
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        info!("Headless browser session started");
        Ok(Self { browser, handler })
    }

    async fn new_page(&self) -> Result<Page> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| VerifyError::Transport(format!("opening browser page: {e}")))
    }

    /// Single teardown point for every exit path.
    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Browser did not close cleanly");
        }
        let _ = self.browser.wait().await;
        self.handler.abort();
    }
}

/// Re-run `attempt` after transport-level navigation failures; other
/// error classes are final.
async fn with_navigation_retries<T, F, Fut>(config: &BrowserConfig, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let attempts = config.navigation_retries + 1;
    let mut last = None;

    for n in 1..=attempts {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(VerifyError::Transport(msg)) => {
                warn!(attempt = n, attempts, %msg, "Browser navigation failed");
                last = Some(VerifyError::Transport(msg));
            }
            Err(other) => return Err(other),
        }
    }

    Err(last.unwrap_or_else(|| VerifyError::Transport("browser navigation failed".into())))
}

async fn capture_pdf_once(
    page: &Page,
    config: &BrowserConfig,
    url: &str,
    download_trigger: Option<&str>,
) -> Result<Vec<u8>> {
    // Attach before navigating so the document response itself can be
    // captured.
    let mut responses = page
        .event_listener::<EventResponseReceived>()
        .await
        .map_err(|e| VerifyError::Transport(format!("attaching network listener: {e}")))?;

    page.goto(url)
        .await
        .map_err(|e| VerifyError::Transport(format!("navigating to {url}: {e}")))?;

    let deadline = Instant::now() + Duration::from_secs(config.capture_timeout_secs);
    let mut triggered = download_trigger.is_none();

    loop {
        let remaining = deadline
            .checked_duration_since(Instant::now())
            .filter(|d| !d.is_zero())
            .ok_or_else(|| {
                VerifyError::DocumentNotAvailable(format!(
                    "no PDF response from {url} within {}s",
                    config.capture_timeout_secs
                ))
            })?;

        // Give the page a head start before provoking the download.
        let step = remaining.min(Duration::from_secs(5));
        match timeout(step, responses.next()).await {
            Ok(Some(event)) => {
                if !event.response.mime_type.eq_ignore_ascii_case("application/pdf") {
                    continue;
                }
                debug!(response_url = %event.response.url, "Captured PDF response");
                let body = page
                    .execute(GetResponseBodyParams::new(event.request_id.clone()))
                    .await
                    .map_err(|e| {
                        VerifyError::Transport(format!("reading captured response: {e}"))
                    })?;
                let bytes = if body.result.base64_encoded {
                    BASE64.decode(body.result.body.as_bytes()).map_err(|e| {
                        VerifyError::ExtractionFailed(format!("decoding captured PDF: {e}"))
                    })?
                } else {
                    body.result.body.clone().into_bytes()
                };
                return Ok(bytes);
            }
            Ok(None) => {
                return Err(VerifyError::Transport("browser event stream ended".into()));
            }
            Err(_) => {
                if !triggered {
                    triggered = true;
                    if let Some(selector) = download_trigger {
                        click_if_present(page, selector).await;
                    }
                }
            }
        }
    }
}

async fn page_text_once(
    page: &Page,
    config: &BrowserConfig,
    url: &str,
    wait_selector: Option<&str>,
) -> Result<String> {
    page.goto(url)
        .await
        .map_err(|e| VerifyError::Transport(format!("navigating to {url}: {e}")))?;

    let deadline = Instant::now() + Duration::from_secs(config.capture_timeout_secs);

    if let Some(selector) = wait_selector {
        wait_for_selector(page, selector, deadline).await?;
    }

    let text: String = page
        .evaluate("document.body.innerText")
        .await
        .map_err(|e| VerifyError::Transport(format!("evaluating page text: {e}")))?
        .into_value()
        .map_err(|e| VerifyError::ExtractionFailed(format!("reading page text: {e}")))?;

    if text.trim().is_empty() {
        return Err(VerifyError::DocumentNotAvailable(format!(
            "rendered page at {url} has no visible text"
        )));
    }

    Ok(text)
}

async fn wait_for_selector(page: &Page, selector: &str, deadline: Instant) -> Result<()> {
    loop {
        if page.find_element(selector).await.is_ok() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(VerifyError::DocumentNotAvailable(format!(
                "slip content ({selector}) never rendered"
            )));
        }
        sleep(Duration::from_millis(500)).await;
    }
}

async fn click_if_present(page: &Page, selector: &str) {
    match page.find_element(selector).await {
        Ok(element) => {
            debug!(selector, "Clicking download trigger");
            if let Err(e) = element.click().await {
                warn!(selector, error = %e, "Download trigger click failed");
            }
        }
        Err(_) => debug!(selector, "No download trigger on page"),
    }
}
