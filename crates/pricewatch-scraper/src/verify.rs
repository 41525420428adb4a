//! Liveness checks for scraped product URLs.
//!
//! Verification is advisory: a `HEAD` probe first, degrading to a
//! body-discarding `GET` for storefronts that reject or mis-handle `HEAD`.
//! Any transport failure counts as "not verified" rather than an error.

use std::time::Duration;

use futures::StreamExt;
use pricewatch_core::Source;
use reqwest::{Client, Method, StatusCode};

use crate::error::ScrapeError;
use crate::identity::{self, Identity};

const VERIFY_TIMEOUT_SECS: u64 = 10;

/// Statuses that mean "retry the probe as a GET" rather than "dead URL".
const HEAD_REJECTED: &[StatusCode] = &[
    StatusCode::FORBIDDEN,
    StatusCode::METHOD_NOT_ALLOWED,
];

pub struct UrlVerifier {
    client: Client,
}

impl UrlVerifier {
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the probe client cannot be built.
    pub fn new() -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(VERIFY_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    /// Returns `true` if `url` currently resolves to a live page.
    ///
    /// A `HEAD` answered below 400 verifies immediately. A rejected or
    /// failed `HEAD` falls back to a `GET` whose body is dropped after the
    /// first chunk, so a verified URL never costs a full page download.
    pub async fn verify(&self, url: &str, source: Source) -> bool {
        let identity = identity::random_identity();

        match self.probe(Method::HEAD, url, identity).await {
            Ok(status) if status.as_u16() < 400 => return true,
            Ok(status) if !HEAD_REJECTED.contains(&status) => {
                tracing::debug!(%source, url, status = status.as_u16(), "HEAD probe says dead");
                return false;
            }
            Ok(status) => {
                tracing::debug!(
                    %source,
                    url,
                    status = status.as_u16(),
                    "HEAD rejected, retrying as GET"
                );
            }
            Err(err) => {
                tracing::debug!(%source, url, error = %err, "HEAD probe failed, retrying as GET");
            }
        }

        match self.probe(Method::GET, url, identity).await {
            Ok(status) => status.as_u16() < 400,
            Err(err) => {
                tracing::debug!(%source, url, error = %err, "GET probe failed");
                false
            }
        }
    }

    async fn probe(
        &self,
        method: Method,
        url: &str,
        identity: Identity,
    ) -> Result<StatusCode, reqwest::Error> {
        let is_get = method == Method::GET;
        let response = self
            .client
            .request(method, url)
            .header(reqwest::header::USER_AGENT, identity.user_agent)
            .header(reqwest::header::ACCEPT, identity.accept)
            .header(reqwest::header::ACCEPT_LANGUAGE, identity.accept_language)
            .send()
            .await?;

        let status = response.status();
        if is_get {
            // Pull at most one chunk so the connection settles, then drop.
            let mut body = response.bytes_stream();
            let _ = body.next().await;
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_rejection_statuses_trigger_get_fallback() {
        assert!(HEAD_REJECTED.contains(&StatusCode::FORBIDDEN));
        assert!(HEAD_REJECTED.contains(&StatusCode::METHOD_NOT_ALLOWED));
        assert!(!HEAD_REJECTED.contains(&StatusCode::NOT_FOUND));
    }
}
