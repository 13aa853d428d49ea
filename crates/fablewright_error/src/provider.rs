//! Provider error types and retry classification.
//!
//! Provider adapters set the [`ProviderErrorKind`] explicitly when they map a
//! failed HTTP exchange, so retry and fallback decisions never depend on the
//! wording of an upstream error message.

use std::fmt;

/// Provider failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Credentials were rejected (HTTP 401/403)
    #[display("Authentication failed: {}", _0)]
    Auth(String),
    /// The provider rejected the request as malformed (HTTP 400/422)
    #[display("Invalid request: {}", _0)]
    BadRequest(String),
    /// Network failure, rate limit or server error worth retrying
    #[display("Transient failure: {}", _0)]
    Transient(String),
    /// Provider is not configured, not compiled in, or the endpoint is missing
    #[display("Provider not available: {}", _0)]
    Unavailable(String),
    /// The call did not finish within its deadline
    #[display("Request timed out after {}ms", millis)]
    Timeout {
        /// Deadline that elapsed, in milliseconds
        millis: u64,
    },
    /// Provider does not declare the requested capability
    #[display("Capability not supported: {}", _0)]
    Unsupported(String),
    /// No provider is configured for the requested channel or capability
    #[display("No providers configured for {}", _0)]
    NoProviders(String),
    /// Every candidate provider failed
    #[display("All {} providers exhausted; last error: {}", candidates, last_error)]
    Exhausted {
        /// Number of candidates tried
        candidates: usize,
        /// Rendering of the last captured error
        last_error: String,
    },
}

impl ProviderErrorKind {
    /// Classify an HTTP status returned by a provider endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use fablewright_error::ProviderErrorKind;
    ///
    /// let kind = ProviderErrorKind::from_status(401, "bad key");
    /// assert!(matches!(kind, ProviderErrorKind::Auth(_)));
    ///
    /// let kind = ProviderErrorKind::from_status(503, "overloaded");
    /// assert!(kind.is_retryable());
    /// ```
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = format!("HTTP {}: {}", status, message.into());
        match status {
            401 | 403 => ProviderErrorKind::Auth(message),
            400 | 422 => ProviderErrorKind::BadRequest(message),
            404 => ProviderErrorKind::Unavailable(message),
            _ => ProviderErrorKind::Transient(message),
        }
    }

    /// Check if this error type should be retried against the same provider.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderErrorKind::Transient(_) | ProviderErrorKind::Timeout { .. }
        )
    }

    /// Short label used for metrics and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderErrorKind::Auth(_) => "auth",
            ProviderErrorKind::BadRequest(_) => "bad_request",
            ProviderErrorKind::Transient(_) => "transient",
            ProviderErrorKind::Unavailable(_) => "unavailable",
            ProviderErrorKind::Timeout { .. } => "timeout",
            ProviderErrorKind::Unsupported(_) => "unsupported",
            ProviderErrorKind::NoProviders(_) => "no_providers",
            ProviderErrorKind::Exhausted { .. } => "exhausted",
        }
    }
}

/// Provider error with an optional provider tag and location tracking.
///
/// # Examples
///
/// ```
/// use fablewright_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::Auth("invalid api key".into()))
///     .with_provider("openai");
/// assert_eq!(err.provider(), Some("openai"));
/// assert!(err.to_string().contains("[openai]"));
/// ```
#[derive(Debug, Clone, derive_more::Error)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    provider: Option<String>,
    line: u32,
    file: &'static str,
}

impl ProviderError {
    /// Create a new provider error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            provider: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Tag the error with the provider that raised it.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ProviderErrorKind {
        &self.kind
    }

    /// Name of the provider that raised the error, when tagged.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Line number where the error was created.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Source file where the error was created.
    pub fn file(&self) -> &'static str {
        self.file
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provider {
            Some(provider) => write!(
                f,
                "Provider Error [{}]: {} at line {} in {}",
                provider, self.kind, self.line, self.file
            ),
            None => write!(
                f,
                "Provider Error: {} at line {} in {}",
                self.kind, self.line, self.file
            ),
        }
    }
}

impl From<ProviderErrorKind> for ProviderError {
    #[track_caller]
    fn from(kind: ProviderErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use fablewright_error::{ProviderError, ProviderErrorKind, RetryableError};
///
/// let err = ProviderError::new(ProviderErrorKind::from_status(503, "Service unavailable"));
/// assert!(err.is_retryable());
///
/// let err = ProviderError::new(ProviderErrorKind::from_status(403, "Forbidden"));
/// assert!(!err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger another attempt.
    ///
    /// Authentication and malformed-request failures return false: repeating
    /// the same call cannot succeed.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ProviderErrorKind::from_status(403, "no"),
            ProviderErrorKind::Auth(_)
        ));
        assert!(matches!(
            ProviderErrorKind::from_status(422, "bad"),
            ProviderErrorKind::BadRequest(_)
        ));
        assert!(matches!(
            ProviderErrorKind::from_status(404, "gone"),
            ProviderErrorKind::Unavailable(_)
        ));
        assert!(matches!(
            ProviderErrorKind::from_status(429, "slow down"),
            ProviderErrorKind::Transient(_)
        ));
    }

    #[test]
    fn test_only_transient_and_timeout_retry() {
        assert!(ProviderErrorKind::Timeout { millis: 10 }.is_retryable());
        assert!(ProviderErrorKind::Transient("x".into()).is_retryable());
        assert!(!ProviderErrorKind::Auth("x".into()).is_retryable());
        assert!(!ProviderErrorKind::BadRequest("x".into()).is_retryable());
        assert!(!ProviderErrorKind::Unavailable("x".into()).is_retryable());
    }

    #[test]
    fn test_untagged_display() {
        let err = ProviderError::new(ProviderErrorKind::NoProviders("text".into()));
        let rendered = err.to_string();
        assert!(rendered.starts_with("Provider Error: No providers configured for text"));
    }
}
