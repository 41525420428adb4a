use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("bot challenge served instead of content at {url}")]
    ChallengeDetected { url: String },

    #[error("page renderer unavailable: {reason}")]
    RendererUnavailable { reason: String },

    #[error("render failed for {url}: {reason}")]
    RenderFailed { url: String, reason: String },
}

impl ScrapeError {
    /// Terminal status on the current attempt, if the error carries one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ScrapeError::Status { status, .. } => Some(*status),
            ScrapeError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
