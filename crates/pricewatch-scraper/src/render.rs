//! Headless-browser render tier for JS-rendered listings.
//!
//! Drives an isolated Chromium instance per call via chromiumoxide with
//! automation indicators suppressed. Launch failure, a challenge page, or
//! any CDP error all surface as typed failures so the per-source scraper
//! degrades to the plain HTTP tier. The browser instance is released on
//! every exit path.

use crate::error::ScrapeError;

#[cfg(feature = "browser")]
use std::time::Duration;

#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig};
#[cfg(feature = "browser")]
use futures::StreamExt;
#[cfg(feature = "browser")]
use rand::Rng;

#[cfg(feature = "browser")]
use crate::identity;
#[cfg(feature = "browser")]
use crate::transport::looks_like_challenge;

/// Chrome flags that suppress the obvious automation fingerprints and keep
/// headless launches alive in containers.
#[cfg(feature = "browser")]
const STEALTH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-dev-shm-usage",
    "--no-first-run",
    "--no-default-browser-check",
    "--no-sandbox",
    "--disable-gpu",
    "--window-size=1920,1080",
];

/// Renders pages in an isolated headless Chromium instance per call.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    _private: (),
}

#[cfg(feature = "browser")]
impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Loads `url` in a fresh browser and returns the rendered DOM as HTML.
    ///
    /// Waits a randomized 2–5 s after navigation so async content settles
    /// before the DOM is read. The browser is closed whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::RendererUnavailable`] — Chromium could not be
    ///   launched; callers should degrade to the HTTP tier.
    /// - [`ScrapeError::RenderFailed`] — navigation or DOM read failed.
    /// - [`ScrapeError::ChallengeDetected`] — the rendered body is a
    ///   bot-challenge interstitial.
    pub async fn render(&self, url: &str) -> Result<String, ScrapeError> {
        let identity = identity::random_identity();
        let mut builder = BrowserConfig::builder();
        for arg in STEALTH_ARGS {
            builder = builder.arg(*arg);
        }
        let config = builder
            .arg(format!("--user-agent={}", identity.user_agent))
            .build()
            .map_err(|reason| ScrapeError::RendererUnavailable { reason })?;

        let (mut browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| ScrapeError::RendererUnavailable {
                    reason: e.to_string(),
                })?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let outcome = Self::render_page(&browser, url).await;

        // Scoped release: close on success, failure, and challenge alike.
        if let Err(e) = browser.close().await {
            tracing::warn!(url, error = %e, "browser close failed");
        }
        let _ = browser.wait().await;
        handler_task.abort();

        outcome
    }

    async fn render_page(browser: &Browser, url: &str) -> Result<String, ScrapeError> {
        let render_failed = |e: chromiumoxide::error::CdpError| ScrapeError::RenderFailed {
            url: url.to_owned(),
            reason: e.to_string(),
        };

        let page = browser.new_page(url).await.map_err(render_failed)?;

        // Human-like settle delay before reading the DOM.
        let settle_ms = rand::rng().random_range(2000..=5000);
        tokio::time::sleep(Duration::from_millis(settle_ms)).await;

        let html = page.content().await.map_err(render_failed)?;
        if looks_like_challenge(&html) {
            return Err(ScrapeError::ChallengeDetected {
                url: url.to_owned(),
            });
        }
        Ok(html)
    }
}

// Stub when the browser feature is disabled: reports unavailable so the
// fallback chain degrades to plain HTTP.
#[cfg(not(feature = "browser"))]
impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Always fails with [`ScrapeError::RendererUnavailable`].
    ///
    /// # Errors
    ///
    /// Unconditionally.
    pub async fn render(&self, url: &str) -> Result<String, ScrapeError> {
        let _ = url;
        Err(ScrapeError::RendererUnavailable {
            reason: "built without the `browser` feature".to_owned(),
        })
    }
}
