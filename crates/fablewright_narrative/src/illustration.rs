//! Illustration prompt composition.
//!
//! Every prompt combines the story's art style guide and theme palette with
//! one of three subject shapes: the child with a known description, a
//! generic friendly child, or the environment alone. Prompts are kept under
//! [`MAX_PROMPT_CHARS`] by shortening the scene description.

use crate::style::{art_style_guide, color_palette};
use fablewright_core::{ArtStyle, Mood};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Target upper bound on prompt length, in characters.
pub const MAX_PROMPT_CHARS: usize = 1500;

/// The scene description is never shortened below this many characters.
pub const MIN_SCENE_CHARS: usize = 50;

/// Extra characters removed beyond the measured excess on each pass.
pub const TRUNCATION_BUFFER: usize = 100;

const SAFETY_CLAUSE: &str = "Do not include any text, words, letters, speech bubbles, \
     multiple scenes or panels, photorealism, or dark or scary elements.";

static PRONOUNS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:he|she|him|her|his|hers|himself|herself|they|them|their|theirs)\b").ok()
});

static SPACES: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s{2,}").ok());

/// Inputs for one illustration prompt.
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder)]
#[builder(setter(into))]
pub struct IllustrationPromptRequest {
    /// Scene text or key moment to depict
    pub scene_description: String,
    /// Name of the child, or joined names for several children
    pub child_name: String,
    /// Story theme, used for the palette
    pub theme: String,
    /// Appearance description for the child
    #[builder(default, setter(into, strip_option))]
    pub character_description: Option<String>,
    /// Whether the child appears in the picture
    #[builder(default = "true")]
    pub include_character: bool,
    /// Story-wide art style
    #[builder(default)]
    pub art_style: ArtStyle,
    /// Scene mood
    #[builder(default)]
    pub mood: Mood,
    /// 1-based scene position
    #[builder(default, setter(into, strip_option))]
    pub scene_number: Option<usize>,
    /// Number of scenes in the story
    #[builder(default, setter(into, strip_option))]
    pub total_scenes: Option<usize>,
}

impl IllustrationPromptRequest {
    /// Start building a request.
    pub fn builder() -> IllustrationPromptRequestBuilder {
        IllustrationPromptRequestBuilder::default()
    }
}

fn mood_feeling(mood: Mood) -> &'static str {
    match mood {
        Mood::Calm => "peaceful and soothing",
        Mood::Magical => "magical and full of wonder",
        Mood::Exciting => "exciting and joyful",
        Mood::Adventurous => "adventurous and brave",
        Mood::Cozy => "warm, cozy and safe",
    }
}

/// Remove the child's name and personal pronouns from scene text.
pub fn strip_character_references(text: &str, child_name: &str) -> String {
    let mut stripped = text.to_string();

    let names: Vec<String> = child_name
        .split(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
        .filter(|n| n.chars().count() > 1 && !n.eq_ignore_ascii_case("and"))
        .map(regex::escape)
        .collect();
    if !names.is_empty()
        && let Ok(pattern) = Regex::new(&format!(r"(?i)\b(?:{})(?:'s)?\b", names.join("|")))
    {
        stripped = pattern.replace_all(&stripped, "").into_owned();
    }

    if let Some(pronouns) = PRONOUNS.as_ref() {
        stripped = pronouns.replace_all(&stripped, "").into_owned();
    }
    if let Some(spaces) = SPACES.as_ref() {
        stripped = spaces.replace_all(&stripped, " ").into_owned();
    }
    stripped.trim().to_string()
}

fn assemble(request: &IllustrationPromptRequest, scene: &str) -> String {
    let guide = art_style_guide(request.art_style);
    let palette = color_palette(&request.theme);
    let name = request.child_name.trim();
    let description = request
        .character_description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let mut parts = Vec::with_capacity(7);

    match (request.include_character, description) {
        (true, Some(description)) => {
            parts.push(format!(
                "A children's book illustration of {}: {}",
                name,
                description.trim_end_matches('.')
            ));
            parts.push(format!("Scene: {}", scene));
            parts.push(format!(
                "Draw {} exactly as described, with the same face, hair, skin tone and clothing.",
                name
            ));
        }
        (true, None) => {
            parts.push(format!(
                "A children's book illustration of {}, a friendly child with a cheerful expression",
                name
            ));
            parts.push(format!("Scene: {}", scene));
            parts.push(format!("Keep {} looking the same throughout.", name));
        }
        (false, _) => {
            parts.push(format!(
                "A children's book illustration of the setting: {}",
                strip_character_references(scene, name)
            ));
            parts.push(
                "Show only the environment, objects and animals, with no people or characters."
                    .to_string(),
            );
        }
    }

    if let (Some(number), Some(total)) = (request.scene_number, request.total_scenes) {
        parts.push(format!(
            "This is illustration {} of {} in one story: use the identical art style, line weight and color palette in every illustration.",
            number, total
        ));
    }

    parts.push(format!(
        "Art style: {}, {}; {}. Inspired by {}.",
        guide.description,
        guide.technique,
        guide.characteristics.join(", "),
        guide.reference_artists.join(", ")
    ));
    parts.push(format!(
        "Colors: {} with {}, accents of {}; background {}; {}.",
        palette.primary, palette.secondary, palette.accent, palette.background, palette.lighting
    ));
    parts.push(SAFETY_CLAUSE.to_string());
    parts.push(format!(
        "For children ages 3 to 8; the picture should feel {} and {}.",
        mood_feeling(request.mood),
        palette.mood
    ));

    parts
        .iter()
        .map(|part| sentence(part))
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence(text: &str) -> String {
    let text = text.trim();
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}

/// Build the illustration prompt for one scene.
///
/// When the prompt is longer than [`MAX_PROMPT_CHARS`], the scene description
/// is cut by the excess plus [`TRUNCATION_BUFFER`] and the prompt rebuilt.
/// Once the description is at [`MIN_SCENE_CHARS`] the prompt is returned even
/// if still over the bound.
///
/// # Examples
///
/// ```
/// use fablewright_narrative::{build_enhanced_illustration_prompt, IllustrationPromptRequest};
///
/// let request = IllustrationPromptRequest::builder()
///     .scene_description("Mia climbed the tallest hill to watch the comet.")
///     .child_name("Mia")
///     .theme("Space")
///     .include_character(false)
///     .build()
///     .unwrap();
///
/// let prompt = build_enhanced_illustration_prompt(&request);
/// assert!(prompt.contains("no people or characters"));
/// assert!(!prompt.contains("Mia"));
/// ```
pub fn build_enhanced_illustration_prompt(request: &IllustrationPromptRequest) -> String {
    let mut scene = request.scene_description.trim().to_string();

    loop {
        let prompt = assemble(request, &scene);
        let length = prompt.chars().count();
        let scene_length = scene.chars().count();

        if length <= MAX_PROMPT_CHARS {
            trace!(length, "Illustration prompt within bound");
            return prompt;
        }
        if scene_length <= MIN_SCENE_CHARS {
            debug!(length, "Illustration prompt over bound at minimum scene length");
            return prompt;
        }

        let excess = length - MAX_PROMPT_CHARS + TRUNCATION_BUFFER;
        let keep = scene_length.saturating_sub(excess).max(MIN_SCENE_CHARS);
        debug!(length, scene_length, keep, "Shortening scene description");
        scene = scene.chars().take(keep).collect::<String>().trim_end().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(include_character: bool, description: Option<&str>) -> IllustrationPromptRequest {
        let mut builder = IllustrationPromptRequest::builder();
        builder
            .scene_description("Leo found a glowing shell on the beach and held it up to his ear.")
            .child_name("Leo")
            .theme("Ocean")
            .include_character(include_character)
            .scene_number(2usize)
            .total_scenes(5usize);
        if let Some(d) = description {
            builder.character_description(d);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_character_with_description() {
        let prompt = build_enhanced_illustration_prompt(&request(
            true,
            Some("A young child with curly black hair."),
        ));
        assert!(prompt.contains("illustration of Leo: A young child with curly black hair"));
        assert!(prompt.contains("Draw Leo exactly as described"));
        assert!(prompt.contains("illustration 2 of 5"));
        assert!(prompt.contains("no text") || prompt.contains("any text"));
        assert!(prompt.contains("turquoise"));
    }

    #[test]
    fn test_character_without_description() {
        let prompt = build_enhanced_illustration_prompt(&request(true, None));
        assert!(prompt.contains("a friendly child"));
        assert!(prompt.contains("Scene: Leo found a glowing shell"));
    }

    #[test]
    fn test_environment_only_strips_name_and_pronouns() {
        let prompt = build_enhanced_illustration_prompt(&request(false, Some("ignored")));
        assert!(!prompt.contains("Leo"));
        assert!(!prompt.contains(" his "));
        assert!(!prompt.contains("ignored"));
        assert!(prompt.contains("no people or characters"));
        assert!(prompt.contains("found a glowing shell"));
    }

    #[test]
    fn test_continuity_needs_both_numbers() {
        let mut req = request(true, None);
        req.total_scenes = None;
        assert!(!build_enhanced_illustration_prompt(&req).contains("illustration 2 of"));
    }

    #[test]
    fn test_strip_possessive_and_group_names() {
        assert_eq!(
            strip_character_references("Mia's kite flew while Sam and she laughed.", "Mia and Sam"),
            "kite flew while and laughed."
        );
    }

    #[test]
    fn test_long_scene_is_bounded() {
        let mut req = request(true, Some("A young child with curly black hair."));
        req.scene_description = "The waves rolled in. ".repeat(200);
        let prompt = build_enhanced_illustration_prompt(&req);
        assert!(prompt.chars().count() <= MAX_PROMPT_CHARS);
        assert!(prompt.contains("Scene: The waves rolled in."));
    }

    #[test]
    fn test_pathological_single_word_terminates() {
        let mut req = request(true, None);
        req.scene_description = "a".repeat(10_000);
        let prompt = build_enhanced_illustration_prompt(&req);
        assert!(prompt.chars().count() <= MAX_PROMPT_CHARS);
    }

    #[test]
    fn test_oversized_description_stops_at_floor() {
        let long_description = "tall ".repeat(400);
        let mut req = request(true, Some(&long_description));
        req.scene_description = "b".repeat(5_000);
        let prompt = build_enhanced_illustration_prompt(&req);
        assert!(prompt.chars().count() > MAX_PROMPT_CHARS);
        assert!(prompt.contains(&format!("Scene: {}.", "b".repeat(MIN_SCENE_CHARS))));
    }

    #[test]
    fn test_multibyte_truncation_is_char_safe() {
        let mut req = request(true, None);
        req.scene_description = "🐚 ".repeat(3_000);
        let prompt = build_enhanced_illustration_prompt(&req);
        assert!(prompt.chars().count() <= MAX_PROMPT_CHARS);
    }
}
