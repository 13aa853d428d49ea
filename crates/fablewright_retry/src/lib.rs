//! Bounded retry with backoff and ordered multi-provider fallback.
//!
//! Two levels cooperate:
//! - [`retry_with_backoff`] retries one operation with exponential delays and
//!   stops early on errors that cannot succeed on a repeat (authentication,
//!   malformed request).
//! - [`retry_with_fallback`] walks an ordered list of candidates, giving each a
//!   short retry budget under a fixed deadline, and returns the first success
//!   together with the index of the candidate that produced it.
//!
//! ```no_run
//! use fablewright_error::ProviderResult;
//! use fablewright_retry::{retry_with_backoff, RetryOptions};
//!
//! # async fn fetch() -> ProviderResult<String> { Ok(String::new()) }
//! # async fn run() -> ProviderResult<()> {
//! let text = retry_with_backoff(|| fetch(), &RetryOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backoff;
mod fallback;

pub use backoff::{RetryOptions, retry_with_backoff};
pub use fallback::{Candidate, FallbackOptions, FallbackOutcome, retry_with_fallback};
