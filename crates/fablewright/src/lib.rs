//! Fablewright - personalised illustrated children's stories
//!
//! Fablewright turns a few facts about a child (name, personality adjectives,
//! optional appearance or photo) and a theme into a short age-appropriate
//! story split into five to seven scenes, each with one illustration. Text and
//! image generation go through ordered provider lists with bounded retry and
//! fallback, so a single provider outage never fails a book.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fablewright::{
//!     BookRequest, ChildProfile, FablewrightConfig, IllustratedBookOrchestrator,
//!     ProviderManager, StorySubject, TextGenerationRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = ProviderManager::from_config(&FablewrightConfig::load()?);
//!     let orchestrator = IllustratedBookOrchestrator::new(Arc::new(manager));
//!
//!     let story = TextGenerationRequest::builder()
//!         .subject(StorySubject::Single(ChildProfile::new("Mia", ["brave", "curious"])))
//!         .theme("Dinosaurs")
//!         .build()?;
//!     let book = orchestrator
//!         .generate_illustrated_book(&BookRequest::builder().story(story).build()?)
//!         .await?;
//!
//!     for page in &book.book_pages {
//!         println!("{}: {}", page.page_number, page.illustration_url);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `anthropic` (default) - Anthropic messages API as a text provider
//!
//! # Architecture
//!
//! - `fablewright_error` - Error types
//! - `fablewright_core` - Data model
//! - `fablewright_interface` - `StoryProvider` trait
//! - `fablewright_retry` - Retry with backoff and provider fallback
//! - `fablewright_models` - Provider adapters, configuration, provider manager
//! - `fablewright_narrative` - Prompts, scene planning and book orchestration
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use fablewright_core::*;
pub use fablewright_error::*;
pub use fablewright_interface::*;
pub use fablewright_models::*;
pub use fablewright_narrative::*;
pub use fablewright_retry::*;

pub mod telemetry;
