//! Ordered fallback across candidate providers.

use crate::{RetryOptions, retry_with_backoff};
use fablewright_error::{ProviderError, ProviderErrorKind, ProviderResult};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// A zero-argument operation bound to one provider.
pub type Candidate<'a, T> = Box<dyn Fn() -> BoxFuture<'a, ProviderResult<T>> + Send + Sync + 'a>;

/// Deadline and per-candidate retry budget for [`retry_with_fallback`].
///
/// Worst-case latency is roughly `candidates × timeout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_setters::Setters)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct FallbackOptions {
    /// Deadline for one candidate, retries included, in milliseconds
    pub timeout_ms: u64,
    /// Retry budget given to each candidate
    pub per_candidate: RetryOptions,
}

impl Default for FallbackOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 90_000,
            per_candidate: RetryOptions {
                max_retries: 1,
                initial_delay_ms: 500,
                backoff_multiplier: 2.0,
                max_delay_ms: 2000,
            },
        }
    }
}

impl FallbackOptions {
    /// Per-candidate deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// First successful result and the index of the candidate that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackOutcome<T> {
    /// Value returned by the successful candidate
    pub result: T,
    /// Zero-based position of that candidate
    pub provider_index: usize,
}

/// Try each candidate in order until one succeeds.
///
/// A candidate is never started before the previous one has finished or hit
/// its deadline. Any failure, fast-failing ones included, moves on to the next
/// candidate without delay. When every candidate fails the returned error is
/// [`ProviderErrorKind::Exhausted`], carrying the last captured error.
pub async fn retry_with_fallback<'a, T>(
    candidates: Vec<Candidate<'a, T>>,
    options: &FallbackOptions,
) -> ProviderResult<FallbackOutcome<T>> {
    if candidates.is_empty() {
        return Err(ProviderError::new(ProviderErrorKind::NoProviders(
            "fallback".to_string(),
        )));
    }

    let total = candidates.len();
    let mut last_error: Option<ProviderError> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let attempt = retry_with_backoff(|| candidate(), &options.per_candidate);

        match tokio::time::timeout(options.timeout(), attempt).await {
            Ok(Ok(result)) => {
                info!(provider_index = index, candidates = total, "Candidate succeeded");
                return Ok(FallbackOutcome {
                    result,
                    provider_index: index,
                });
            }
            Ok(Err(e)) => {
                warn!(provider_index = index, error = %e, "Candidate failed, trying next");
                last_error = Some(e);
            }
            Err(_) => {
                let e = ProviderError::new(ProviderErrorKind::Timeout {
                    millis: options.timeout_ms,
                });
                warn!(provider_index = index, error = %e, "Candidate timed out, trying next");
                last_error = Some(e);
            }
        }
    }

    let (last_rendered, last_provider) = match &last_error {
        Some(e) => (e.kind().to_string(), e.provider().map(str::to_string)),
        None => (String::from("unknown"), None),
    };
    let exhausted = ProviderError::new(ProviderErrorKind::Exhausted {
        candidates: total,
        last_error: last_rendered,
    });

    Err(match last_provider {
        Some(provider) => exhausted.with_provider(provider),
        None => exhausted,
    })
}
