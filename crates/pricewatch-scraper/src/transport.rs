//! Outbound HTTP fetches against anti-bot-protected storefronts.
//!
//! Every attempt presents a freshly drawn identity from the rotation pool,
//! terminates successfully only on a 200 with a usable body, and converts
//! every network or status failure into a typed [`ScrapeError`]. Retries
//! and backoff live in [`crate::retry`].

use std::time::Duration;

use reqwest::Client;

use crate::error::ScrapeError;
use crate::identity::{self, Identity};
use crate::retry::with_backoff;

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP transport with identity rotation and retry/backoff policy.
///
/// One `Transport` owns one connection pool; per-request headers carry the
/// rotated identity so the pool itself stays fingerprint-neutral.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    max_attempts: u32,
    backoff_base_ms: u64,
    mobile: bool,
}

impl Transport {
    /// Creates a `Transport` with configured timeout and retry policy.
    ///
    /// `backoff_base_ms` scales the `uniform(2^k, 2^(k+1))` second backoff
    /// window; production callers pass 1000, tests pass 0 to skip sleeping.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        max_attempts: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            max_attempts,
            backoff_base_ms,
            mobile: false,
        })
    }

    /// The production default: 15 s timeout, 3 attempts, full backoff.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the client cannot be constructed.
    pub fn with_defaults() -> Result<Self, ScrapeError> {
        Self::new(
            DEFAULT_TIMEOUT_SECS,
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_BACKOFF_BASE_MS,
        )
    }

    /// Restricts identity rotation to mobile/tablet fingerprints, for the
    /// mobile search variant.
    #[must_use]
    pub fn mobile(mut self, mobile: bool) -> Self {
        self.mobile = mobile;
        self
    }

    fn next_identity(&self) -> Identity {
        if self.mobile {
            identity::random_mobile_identity()
        } else {
            identity::random_identity()
        }
    }

    /// Fetches `url` and returns the response body.
    ///
    /// Retries on network errors and retriable statuses with a fresh
    /// identity per attempt. A challenge page in an otherwise-200 body is
    /// surfaced as [`ScrapeError::ChallengeDetected`] so callers can fall
    /// through to the next tier instead of parsing an interstitial.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Status`] — terminal non-200 after all attempts.
    /// - [`ScrapeError::Http`] — network/timeout failure after all attempts.
    /// - [`ScrapeError::ChallengeDetected`] — bot-defense page served.
    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        with_backoff(self.max_attempts, self.backoff_base_ms, || async move {
            let identity = self.next_identity();
            let response = self
                .client
                .get(url)
                .header(reqwest::header::USER_AGENT, identity.user_agent)
                .header(reqwest::header::ACCEPT, identity.accept)
                .header(reqwest::header::ACCEPT_LANGUAGE, identity.accept_language)
                .send()
                .await?;

            let status = response.status();
            if status != reqwest::StatusCode::OK {
                return Err(ScrapeError::Status {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            let body = response.text().await?;
            if looks_like_challenge(&body) {
                return Err(ScrapeError::ChallengeDetected {
                    url: url.to_owned(),
                });
            }
            Ok(body)
        })
        .await
    }
}

/// Known bot-challenge phrases served in place of real content.
const CHALLENGE_MARKERS: &[&str] = &[
    "sorry, we just need to make sure you're not a robot",
    "enter the characters you see below",
    "just a moment...",
    "please enable cookies",
    "/cdn-cgi/challenge-platform/",
    "px-captcha",
];

/// Returns `true` if `body` is a bot-defense interstitial rather than a
/// results page.
#[must_use]
pub fn looks_like_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    CHALLENGE_MARKERS.iter().any(|m| lowered.contains(m))
}
