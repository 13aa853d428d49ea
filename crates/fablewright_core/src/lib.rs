//! Core data types for the Fablewright story generation pipeline.
//!
//! Every value here is created fresh per orchestration call and discarded
//! once the result is returned.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod book;
mod child;
mod provider;
mod request;
mod story;
mod style;

pub use book::{BookPage, IllustratedBook, Scene};
pub use child::{Appearance, CharacterTier, ChildIdentity, NO_SELECTION};
pub use provider::{Capabilities, Capability, Channel, ProviderDescriptor, ProviderKind};
pub use request::{
    CompletionRequest, CompletionRequestBuilder, CompletionRequestBuilderError, GeneratedImage,
    ImageGenerationRequest, ImageGenerationRequestBuilder, ImageGenerationRequestBuilderError,
    ImageInput, ImageSize, ImageStyle,
};
pub use story::{
    AgeBand, ChildProfile, StorySubject, TextGenerationRequest, TextGenerationRequestBuilder,
    TextGenerationRequestBuilderError,
};
pub use style::{ArtStyle, Mood};
