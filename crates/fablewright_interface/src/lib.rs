//! Trait definitions for the Fablewright story generation pipeline.
//!
//! Text and image backends implement one trait, [`StoryProvider`], and declare
//! which operations they support through capability flags.

mod traits;

pub use traits::StoryProvider;
