//! Retry and backoff policy for outbound fetches.
//!
//! Transient failures (429/5xx statuses and network-level errors) are
//! retried with jittered exponential backoff; everything else is returned
//! immediately. 403 is treated as likely-blocked: it is retried because
//! every attempt presents a fresh identity, but it is logged loudly and
//! never waits longer than the normal schedule.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::ScrapeError;

/// Statuses retried after a backoff delay.
const RETRIABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Returns `true` if `err` is a transient condition worth another attempt
/// with a fresh identity.
fn is_retriable(err: &ScrapeError) -> bool {
    match err {
        ScrapeError::Http(_) => true,
        ScrapeError::Status { status, .. } => {
            RETRIABLE_STATUSES.contains(status) || *status == 403
        }
        _ => false,
    }
}

/// Milliseconds to sleep before attempt `attempt + 1`.
///
/// The window is `uniform(2^k, 2^(k+1))` seconds scaled by
/// `backoff_base_ms / 1000`, so the production base of 1000 ms reproduces
/// the plain `uniform(2^k, 2^(k+1))` schedule and tests can pass 0 to skip
/// sleeping. A 503 adds an extended 3–5 s politeness window on the same
/// scale — the server told us it is overloaded.
fn backoff_ms(attempt: u32, backoff_base_ms: u64, last_status: Option<u16>) -> u64 {
    if backoff_base_ms == 0 {
        return 0;
    }
    let mut rng = rand::rng();
    let low = (1u64 << attempt.min(16)) * backoff_base_ms;
    let high = (1u64 << (attempt + 1).min(17)) * backoff_base_ms;
    let mut ms = rng.random_range(low..high);
    if last_status == Some(503) {
        ms += rng.random_range(3000..=5000) * backoff_base_ms / 1000;
    }
    ms
}

/// Executes `operation` up to `max_attempts` times, sleeping between
/// attempts per [`backoff_ms`]. At least one attempt always runs. The last
/// error is returned once attempts are exhausted; non-retriable errors are
/// returned immediately.
pub(crate) async fn with_backoff<T, F, Fut>(
    max_attempts: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScrapeError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt + 1 >= max_attempts {
                    return Err(err);
                }

                let status = err.status_code();
                if matches!(status, Some(403 | 429)) {
                    tracing::warn!(
                        attempt,
                        status,
                        "likely blocked by target — rotating identity and retrying"
                    );
                }

                let delay_ms = backoff_ms(attempt, backoff_base_ms, status);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms,
                    error = %err,
                    "transient fetch error — retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
        }
    }
}
