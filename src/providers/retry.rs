// Transport retry with exponential backoff
//
// Only agent transport failures are retried here. The refinement loop never
// retries a round; a call that still fails after the last attempt is fatal
// for the run.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// Non-2xx answer from an agent endpoint.
#[derive(Debug, Error)]
#[error("{provider} API request failed\n\nStatus: {status}\nBody: {body}")]
pub struct ApiStatusError {
    pub provider: String,
    pub status: u16,
    pub body: String,
}

impl ApiStatusError {
    /// 408, 429 and 5xx may succeed later; other statuses will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self.status, 408 | 429) || self.status >= 500
    }
}

/// Whether `err` is worth another attempt. Errors without a status
/// (connect, timeout, decode) are treated as transient.
fn is_retryable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiStatusError>()
        .map_or(true, ApiStatusError::is_retryable)
}

/// Backoff schedule for one agent call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first (1 = no retry)
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles on each further attempt
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: crate::config::constants::DEFAULT_TRANSPORT_ATTEMPTS,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Single attempt, no backoff.
    pub fn none() -> Self {
        Self::new(1)
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Execute `f` until it succeeds or the policy runs out of attempts.
pub async fn with_retry<F, Fut, T>(policy: RetryPolicy, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt + 1 >= attempts => return Err(e),
            Err(e) if !is_retryable(&e) => {
                tracing::debug!("Request failed with a permanent error: {:#}", e);
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    "Request failed (attempt {}/{}): {:#}; retrying in {:?}",
                    attempt + 1,
                    attempts,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
