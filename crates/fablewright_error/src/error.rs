//! Top-level error wrapper types.

use crate::{ConfigError, FileError, JsonError, ProviderError, StoryError};

/// Every error condition the pipeline can surface to a caller.
///
/// # Examples
///
/// ```
/// use fablewright_error::{FablewrightError, ConfigError};
///
/// let err: FablewrightError = ConfigError::new("missing providers table").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FablewrightErrorKind {
    /// Provider call failed
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Story orchestration error
    #[from(StoryError)]
    Story(StoryError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// File read or write error
    #[from(FileError)]
    File(FileError),
}

/// Fablewright error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fablewright Error: {}", _0)]
pub struct FablewrightError(Box<FablewrightErrorKind>);

impl FablewrightError {
    /// Create a new error from a kind.
    pub fn new(kind: FablewrightErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FablewrightErrorKind {
        &self.0
    }
}

impl<T> From<T> for FablewrightError
where
    T: Into<FablewrightErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fablewright operations.
pub type FablewrightResult<T> = std::result::Result<T, FablewrightError>;
