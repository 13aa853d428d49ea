//! Shared HTTP plumbing for provider adapters.
//!
//! Adapters classify failures here, from transport errors and HTTP status
//! codes, so every [`ProviderError`] leaves an adapter with an explicit kind.

use fablewright_error::{ProviderError, ProviderErrorKind, ProviderResult};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::error;

/// Per-request deadline applied by every adapter.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Error bodies are clipped to this many characters before logging.
const MAX_ERROR_BODY: usize = 500;

/// Send a request and return the response if the status is a success.
pub(crate) async fn send(provider: &str, request: RequestBuilder) -> ProviderResult<Response> {
    let response = request
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(|e| transport_error(provider, e))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(MAX_ERROR_BODY).collect();
    error!(provider, status = %status, body = %body, "Provider returned error status");

    Err(
        ProviderError::new(ProviderErrorKind::from_status(status.as_u16(), body))
            .with_provider(provider),
    )
}

/// Send a request and decode a JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> ProviderResult<T> {
    let response = send(provider, request).await?;
    response.json::<T>().await.map_err(|e| {
        error!(provider, error = ?e, "Failed to parse provider response");
        ProviderError::new(ProviderErrorKind::Transient(format!(
            "Failed to parse response: {}",
            e
        )))
        .with_provider(provider)
    })
}

/// Classify a reqwest transport failure.
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> ProviderError {
    error!(provider, error = ?err, "Failed to reach provider");
    let kind = if err.is_timeout() {
        ProviderErrorKind::Timeout {
            millis: REQUEST_TIMEOUT.as_millis() as u64,
        }
    } else if err.is_builder() {
        ProviderErrorKind::BadRequest(format!("Could not build request: {}", err))
    } else {
        ProviderErrorKind::Transient(format!("Request failed: {}", err))
    };
    ProviderError::new(kind).with_provider(provider)
}

/// Error for a provider whose API key is not set.
#[track_caller]
pub(crate) fn missing_key(provider: &str, env_var: &str) -> ProviderError {
    ProviderError::new(ProviderErrorKind::Unavailable(format!(
        "{} is not set",
        env_var
    )))
    .with_provider(provider)
}

/// Error for a response that decoded but carried no usable output.
#[track_caller]
pub(crate) fn empty_output(provider: &str, what: &str) -> ProviderError {
    ProviderError::new(ProviderErrorKind::Transient(format!(
        "Provider returned no {}",
        what
    )))
    .with_provider(provider)
}
