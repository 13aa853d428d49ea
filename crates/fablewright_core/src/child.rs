//! Child identity data and the character rendering tier.

use serde::{Deserialize, Serialize};

/// Sentinel the account layer stores for "no selection" in appearance pickers.
pub const NO_SELECTION: &str = "none";

/// Manually chosen appearance attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    /// Skin tone description
    #[serde(default)]
    pub skin_tone: Option<String>,
    /// Hair color
    #[serde(default)]
    pub hair_color: Option<String>,
    /// Hair style
    #[serde(default)]
    pub hair_style: Option<String>,
}

impl Appearance {
    /// Attribute value unless it is missing, blank or the `"none"` sentinel.
    pub fn selected(value: &Option<String>) -> Option<&str> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(NO_SELECTION))
    }

    /// True when at least one attribute carries a real selection.
    pub fn has_selection(&self) -> bool {
        [&self.skin_tone, &self.hair_color, &self.hair_style]
            .into_iter()
            .any(|v| Self::selected(v).is_some())
    }
}

/// Identity data the account layer holds for a child.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildIdentity {
    /// Description derived from an ephemeral photo
    #[serde(default)]
    pub ai_description: Option<String>,
    /// Manually chosen appearance
    #[serde(default)]
    pub appearance: Option<Appearance>,
    /// Age in years
    #[serde(default)]
    pub age: Option<u8>,
}

/// Fidelity at which the child is rendered in illustrations, highest first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CharacterTier {
    /// Description derived from a photo
    Photo,
    /// Description synthesised from chosen attributes
    Appearance,
    /// Environment-only illustrations
    None,
}

impl CharacterTier {
    /// Whether illustrations at this tier include the child.
    pub fn includes_character(&self) -> bool {
        !matches!(self, CharacterTier::None)
    }
}
