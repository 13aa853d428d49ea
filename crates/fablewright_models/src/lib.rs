//! Text and image provider integrations for Fablewright.
//!
//! Each adapter implements [`fablewright_interface::StoryProvider`] over a
//! provider's REST API. [`ProviderManager`] holds the ordered provider lists
//! from configuration and runs every request through multi-provider fallback.
//!
//! # Available Providers
//!
//! - **OpenAI** - text, image analysis and image generation
//! - **Anthropic** - text and image analysis, enable with the `anthropic` feature (default)
//! - **Gemini** - text and image analysis
//! - **Stability** - image generation
//!
//! # Example
//!
//! ```no_run
//! use fablewright_core::ImageGenerationRequest;
//! use fablewright_models::{FablewrightConfig, ProviderManager};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ProviderManager::from_config(&FablewrightConfig::load()?);
//! let images = manager
//!     .generate_images(&ImageGenerationRequest::single("A fox reading under a tree", Default::default()))
//!     .await?;
//! println!("{}", images[0].url);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod gemini;
mod http;
mod manager;
mod metrics;
mod openai;
mod registry;
mod stability;

#[cfg(feature = "anthropic")]
mod anthropic;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::{
    DEFAULT_PROVIDER, FablewrightConfig, ProviderLists, ProviderSettings, parse_provider_list,
};
pub use gemini::GeminiClient;
pub use manager::{DEFAULT_ANALYSIS_PROMPT, ProviderManager};
pub use metrics::LlmMetrics;
pub use openai::OpenAiClient;
pub use registry::{ProviderSlot, build_provider};
pub use stability::StabilityClient;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicClient;
