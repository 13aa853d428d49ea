//! Error types for the Fablewright story generation pipeline.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use fablewright_error::{FablewrightResult, ProviderError, ProviderErrorKind};
//!
//! fn call_provider() -> FablewrightResult<String> {
//!     Err(ProviderError::new(ProviderErrorKind::Transient("connection reset".into())))?
//! }
//!
//! assert!(call_provider().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod file;
mod json;
mod provider;
mod story;

pub use config::ConfigError;
pub use error::{FablewrightError, FablewrightErrorKind, FablewrightResult};
pub use file::{FileError, FileErrorKind};
pub use json::JsonError;
pub use provider::{ProviderError, ProviderErrorKind, ProviderResult, RetryableError};
pub use story::{StoryError, StoryErrorKind};
