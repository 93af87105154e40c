//! HTTP transport with bounded retry on transient failures.
//!
//! Only transport-level failures (timeouts, connection errors) are
//! retried here. HTTP statuses are never inspected at this layer; the
//! provider classifies them after a response is received, so typed errors
//! like 401 or 429 can never be swallowed by the retry loop.

use reqwest::{RequestBuilder, Response};
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use super::CatalogError;

/// Retry policy for transient network failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles per attempt.
    pub initial_backoff: Duration,
    /// Upper bound on any single backoff.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(10),
        }
    }
}

/// Executes requests, absorbing up to `max_attempts - 1` transient
/// network failures with exponential backoff.
pub struct RetryingTransport {
    policy: RetryPolicy,
}

impl RetryingTransport {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Send the request, retrying timeouts and connection failures.
    ///
    /// Returns the raw response; the caller owns status classification.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, CatalogError> {
        let mut backoff = self.policy.initial_backoff;

        for attempt in 1..=self.policy.max_attempts {
            let builder = request.try_clone().ok_or_else(|| {
                CatalogError::Network("request body is not cloneable for retry".to_string())
            })?;

            match builder.send().await {
                Ok(response) => return Ok(response),
                Err(e) if is_transient(&e) => {
                    if attempt == self.policy.max_attempts {
                        warn!(attempt, error = %e, "transport retries exhausted");
                        return Err(CatalogError::Network(e.to_string()));
                    }
                    debug!(attempt, backoff_ms = backoff.as_millis() as u64, error = %e,
                        "transient failure, retrying");
                    sleep(backoff).await;
                    backoff = (backoff * 2).min(self.policy.max_backoff);
                }
                Err(e) => return Err(CatalogError::Network(e.to_string())),
            }
        }

        unreachable!("retry loop always returns within max_attempts")
    }
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect()
}
