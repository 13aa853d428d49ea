//! Exponential backoff for a single operation.

use fablewright_error::{ProviderError, ProviderResult, RetryableError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};

/// Retry budget and delay curve for [`retry_with_backoff`].
///
/// `max_retries` counts repeats after the first attempt, so an operation runs
/// at most `max_retries + 1` times.
///
/// # Examples
///
/// ```
/// use fablewright_retry::RetryOptions;
/// use std::time::Duration;
///
/// let options = RetryOptions::default();
/// assert_eq!(options.delay_before(1), Duration::from_millis(2000));
/// assert_eq!(options.delay_before(3), Duration::from_millis(8000));
/// assert_eq!(options.delay_before(4), Duration::from_millis(10_000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_setters::Setters)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct RetryOptions {
    /// Repeats allowed after the first attempt, not total calls; zero means
    /// a single attempt
    pub max_retries: usize,
    /// Base delay in milliseconds
    pub initial_delay_ms: u64,
    /// Growth factor applied per attempt
    pub backoff_multiplier: f64,
    /// Upper bound on any single delay, in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            backoff_multiplier: 2.0,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryOptions {
    /// Delay slept before attempt `attempt` (1-based repeat number):
    /// `min(initial * multiplier^attempt, max)`.
    pub fn delay_before(&self, attempt: usize) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        let capped = raw.min(self.max_delay_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    /// The full delay schedule, one entry per permitted repeat.
    pub fn schedule(&self) -> Vec<Duration> {
        (1..=self.max_retries).map(|k| self.delay_before(k)).collect()
    }
}

/// Run `op`, repeating retryable failures along the backoff schedule.
///
/// Errors whose kind is not retryable (authentication, malformed request,
/// unavailable, unsupported) are returned after the attempt that raised them.
/// When the schedule runs out, the last error is returned.
pub async fn retry_with_backoff<T, F, Fut>(mut op: F, options: &RetryOptions) -> ProviderResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProviderResult<T>>,
{
    let schedule = options.schedule();
    let mut attempt = 0usize;

    Retry::spawn(schedule, || {
        attempt += 1;
        let current = attempt;
        let fut = op();
        async move {
            match fut.await {
                Ok(value) => {
                    debug!(attempt = current, "Attempt succeeded");
                    Ok(value)
                }
                Err(e) => Err(classify(e, current)),
            }
        }
    })
    .await
}

fn classify(err: ProviderError, attempt: usize) -> RetryError<ProviderError> {
    if err.is_retryable() {
        warn!(attempt, error = %err, "Attempt failed, will retry if budget remains");
        RetryError::Transient {
            err,
            retry_after: None,
        }
    } else {
        warn!(attempt, error = %err, "Permanent error, failing immediately");
        RetryError::Permanent(err)
    }
}
