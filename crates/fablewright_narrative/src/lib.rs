//! Story generation pipeline for Fablewright.
//!
//! The pure steps live in their own modules and need no network access:
//! - [`build_story_prompt`] renders the narrative instruction
//! - [`determine_character_tier`] picks how the child is drawn
//! - [`extract_scenes_from_story`] splits a narrative into scenes
//! - [`build_enhanced_illustration_prompt`] composes one image prompt
//!
//! [`IllustratedBookOrchestrator`] chains them with a
//! [`ProviderManager`](fablewright_models::ProviderManager) to produce an
//! [`IllustratedBook`](fablewright_core::IllustratedBook).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod character;
mod illustration;
mod orchestrator;
mod scenes;
mod story_prompt;
mod style;

pub use character::{
    CharacterRendering, describe_appearance, determine_character_tier, resolve_character,
};
pub use illustration::{
    IllustrationPromptRequest, IllustrationPromptRequestBuilder,
    IllustrationPromptRequestBuilderError, MAX_PROMPT_CHARS, MIN_SCENE_CHARS, TRUNCATION_BUFFER,
    build_enhanced_illustration_prompt, strip_character_references,
};
pub use orchestrator::{
    BookRequest, BookRequestBuilder, BookRequestBuilderError, IllustratedBookOrchestrator,
    PHOTO_DESCRIPTION_PROMPT,
};
pub use scenes::{
    HeuristicKeyMoment, KeyMomentExtractor, MAX_SCENES, MIN_SCENES, MIN_SECTION_CHARS,
    ScenePlanner, StyleOverrides, equal_word_chunks, extract_scenes_from_story,
    split_into_sections,
};
pub use story_prompt::{
    AgeGuidance, DEFAULT_ARC, EmotionalArc, STORY_SYSTEM_PROMPT, STORY_TEMPERATURE, age_guidance,
    build_story_prompt, completion_for, select_emotional_arc, sensory_details, template_guidance,
};
pub use style::{
    ArtStyleGuide, ColorPalette, art_style_guide, color_palette, determine_mood_from_scene,
    select_art_style,
};
