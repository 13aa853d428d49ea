//! Art style and mood identifiers shared by every scene of a story.

use serde::{Deserialize, Serialize};

/// The four illustration styles a story can be rendered in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ArtStyle {
    /// Traditional picture-book gouache and ink
    #[default]
    ClassicPictureBook,
    /// Soft watercolor washes
    Watercolor,
    /// Flat vector shapes
    ModernFlat,
    /// Playful, exaggerated fantasy
    Whimsical,
}

/// Scene mood buckets, in classifier priority order.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mood {
    /// Quiet, restful
    Calm,
    /// Enchanted, glowing
    Magical,
    /// High energy
    #[default]
    Exciting,
    /// Exploring, brave
    Adventurous,
    /// Warm, homely
    Cozy,
}
