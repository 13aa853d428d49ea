//! Scene planning: split a narrative into illustratable scenes.

use crate::illustration::{IllustrationPromptRequest, build_enhanced_illustration_prompt};
use crate::style::{determine_mood_from_scene, select_art_style};
use fablewright_core::{ArtStyle, Mood, Scene};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, instrument};

/// Sections must be longer than this many characters to become scenes.
pub const MIN_SECTION_CHARS: usize = 50;

/// Upper bound on scenes per story.
pub const MAX_SCENES: usize = 7;

/// Fewer sections than this triggers the next splitting strategy.
pub const MIN_SCENES: usize = 5;

/// Key moments fall back to this many leading characters.
const KEY_MOMENT_FALLBACK_CHARS: usize = 200;

/// Minimum length of a sentence used as a fallback key moment.
const MIN_SENTENCE_CHARS: usize = 20;

const ACTION_VERBS: &[&str] = &[
    "discovered", "found", "saw", "climbed", "opened", "jumped", "ran", "flew", "reached",
    "spotted", "built", "helped", "hugged", "picked", "held", "grabbed", "swam", "danced",
    "explored", "caught", "watched", "followed",
];

static BLANK_LINES: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n").ok());

static SENTENCES: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"[^.!?]+(?:[.!?]+["'”’]?|$)"#).ok());

static PROGRESSIVE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:was|were|is|are)\s+\w+ing\b").ok());

/// Picks the single moment of a section worth illustrating.
pub trait KeyMomentExtractor: Send + Sync {
    /// Return the text to illustrate for `section`.
    fn extract_key_moment(&self, section: &str, child_name: &str) -> String;
}

/// Regex heuristic favouring one concrete action sentence.
///
/// Prefers a sentence where the child's name is followed by an action verb,
/// then a sentence with a progressive verb ("was running"), then the first
/// sentence longer than 20 characters, then the first 200 characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicKeyMoment;

impl HeuristicKeyMoment {
    fn name_action(child_name: &str) -> Option<Regex> {
        let names: Vec<String> = child_name
            .split(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
            .filter(|n| n.chars().count() > 1 && !n.eq_ignore_ascii_case("and"))
            .map(regex::escape)
            .collect();
        if names.is_empty() {
            return None;
        }
        Regex::new(&format!(
            r"(?i)\b(?:{})\b[^.!?]*?\b(?:{})\b",
            names.join("|"),
            ACTION_VERBS.join("|")
        ))
        .ok()
    }
}

impl KeyMomentExtractor for HeuristicKeyMoment {
    fn extract_key_moment(&self, section: &str, child_name: &str) -> String {
        let sentences = split_sentences(section);

        let anchored = Self::name_action(child_name)
            .and_then(|pattern| sentences.iter().find(|s| pattern.is_match(s)))
            .or_else(|| {
                PROGRESSIVE
                    .as_ref()
                    .and_then(|pattern| sentences.iter().find(|s| pattern.is_match(s)))
            });
        if let Some(sentence) = anchored {
            return sentence.to_string();
        }

        if let Some(sentence) = sentences
            .iter()
            .find(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        {
            return sentence.to_string();
        }

        section
            .trim()
            .chars()
            .take(KEY_MOMENT_FALLBACK_CHARS)
            .collect()
    }
}

fn split_sentences(text: &str) -> Vec<&str> {
    match SENTENCES.as_ref() {
        Some(pattern) => pattern
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .collect(),
        None => vec![text.trim()],
    }
}

/// Story-wide style choices that bypass automatic selection.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters,
)]
#[setters(prefix = "with_", strip_option)]
#[serde(rename_all = "camelCase")]
pub struct StyleOverrides {
    /// Art style for every scene
    #[serde(default)]
    pub art_style: Option<ArtStyle>,
    /// Mood for every scene
    #[serde(default)]
    pub mood: Option<Mood>,
}

fn keep_sections<'a>(pieces: impl Iterator<Item = &'a str>) -> Vec<String> {
    pieces
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SECTION_CHARS)
        .take(MAX_SCENES)
        .map(str::to_string)
        .collect()
}

/// Partition the words of `content` into exactly five runs of equal size.
///
/// Runs may start or end mid-sentence. With fewer than five words the empty
/// runs repeat the whole text. Blank input yields no runs.
pub fn equal_word_chunks(content: &str) -> Vec<String> {
    let words: Vec<&str> = content.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }
    let n = words.len();
    (0..MIN_SCENES)
        .map(|i| {
            let chunk = &words[i * n / MIN_SCENES..(i + 1) * n / MIN_SCENES];
            if chunk.is_empty() {
                words.join(" ")
            } else {
                chunk.join(" ")
            }
        })
        .collect()
}

/// Split narrative text into scene sections.
///
/// Tries blank-line paragraphs, then single lines, then five equal word
/// runs, keeping the first strategy that yields at least five sections.
pub fn split_into_sections(content: &str) -> Vec<String> {
    let content = content.replace("\r\n", "\n");

    let paragraphs = match BLANK_LINES.as_ref() {
        Some(pattern) => keep_sections(pattern.split(&content)),
        None => keep_sections(content.split("\n\n")),
    };
    if paragraphs.len() >= MIN_SCENES {
        debug!(sections = paragraphs.len(), "Split on blank lines");
        return paragraphs;
    }

    let lines = keep_sections(content.lines());
    if lines.len() >= MIN_SCENES {
        debug!(sections = lines.len(), "Split on line breaks");
        return lines;
    }

    debug!("Falling back to equal word chunks");
    equal_word_chunks(&content)
}

/// Scene planner with a pluggable key-moment strategy.
pub struct ScenePlanner {
    extractor: Box<dyn KeyMomentExtractor>,
}

impl Default for ScenePlanner {
    fn default() -> Self {
        Self::new(Box::new(HeuristicKeyMoment))
    }
}

impl std::fmt::Debug for ScenePlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenePlanner").finish_non_exhaustive()
    }
}

impl ScenePlanner {
    /// Create a planner using `extractor` for key moments.
    pub fn new(extractor: Box<dyn KeyMomentExtractor>) -> Self {
        Self { extractor }
    }

    /// Split `content` into scenes, each with its illustration prompt.
    ///
    /// One art style is chosen for the whole story from the theme with a
    /// neutral mood, so it never varies between scenes.
    #[instrument(skip(self, content, character_description), fields(content_len = content.len()))]
    pub fn plan(
        &self,
        content: &str,
        child_name: &str,
        theme: &str,
        character_description: Option<&str>,
        include_character: bool,
        overrides: StyleOverrides,
    ) -> Vec<Scene> {
        let sections = split_into_sections(content);
        let total = sections.len();
        let art_style = overrides
            .art_style
            .unwrap_or_else(|| select_art_style(theme, Mood::Exciting));

        debug!(scenes = total, %art_style, "Planning scenes");

        sections
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let index = i + 1;
                let key_moment = self.extractor.extract_key_moment(&text, child_name);
                let mood = overrides
                    .mood
                    .unwrap_or_else(|| determine_mood_from_scene(&text));

                let prompt_request = IllustrationPromptRequest {
                    scene_description: key_moment.clone(),
                    child_name: child_name.to_string(),
                    theme: theme.to_string(),
                    character_description: character_description.map(str::to_string),
                    include_character,
                    art_style,
                    mood,
                    scene_number: Some(index),
                    total_scenes: Some(total),
                };

                Scene {
                    index,
                    illustration_prompt: build_enhanced_illustration_prompt(&prompt_request),
                    text,
                    key_moment,
                    art_style,
                    mood,
                }
            })
            .collect()
    }
}

/// Plan scenes with the default heuristic key-moment strategy.
///
/// # Examples
///
/// ```
/// use fablewright_narrative::{extract_scenes_from_story, StyleOverrides};
///
/// let story = "Mia woke up early and looked out at the sparkling frost on the garden. ".repeat(4);
/// let scenes = extract_scenes_from_story(&story, "Mia", "Winter", None, true, StyleOverrides::default());
///
/// assert_eq!(scenes.len(), 5);
/// assert!(scenes.iter().all(|s| s.art_style == scenes[0].art_style));
/// ```
pub fn extract_scenes_from_story(
    content: &str,
    child_name: &str,
    theme: &str,
    character_description: Option<&str>,
    include_character: bool,
    overrides: StyleOverrides,
) -> Vec<Scene> {
    ScenePlanner::default().plan(
        content,
        child_name,
        theme,
        character_description,
        include_character,
        overrides,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(n: usize) -> String {
        format!(
            "In part {} of the story the little fox wandered through the quiet meadow looking for friends.",
            n
        )
    }

    #[test]
    fn test_paragraphs_cap_at_seven() {
        let story: Vec<String> = (1..=9).map(paragraph).collect();
        let sections = split_into_sections(&story.join("\n\n"));
        assert_eq!(sections.len(), MAX_SCENES);
        assert!(sections[0].starts_with("In part 1"));
    }

    #[test]
    fn test_short_paragraphs_are_dropped() {
        let mut story: Vec<String> = (1..=5).map(paragraph).collect();
        story.insert(2, "The End.".to_string());
        let sections = split_into_sections(&story.join("\n\n"));
        assert_eq!(sections.len(), 5);
        assert!(sections.iter().all(|s| s != "The End."));
    }

    #[test]
    fn test_single_newlines_used_when_paragraphs_scarce() {
        let story: Vec<String> = (1..=6).map(paragraph).collect();
        let sections = split_into_sections(&story.join("\n"));
        assert_eq!(sections.len(), 6);
    }

    #[test]
    fn test_equal_chunks_for_unbroken_text() {
        let text = "word ".repeat(53);
        let chunks = equal_word_chunks(&text);
        assert_eq!(chunks.len(), 5);
        let total: usize = chunks.iter().map(|c| c.split_whitespace().count()).sum();
        assert_eq!(total, 53);
    }

    #[test]
    fn test_equal_chunks_with_few_words() {
        let chunks = equal_word_chunks("Once upon");
        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_blank_input_has_no_sections() {
        assert!(split_into_sections("  \n\n  ").is_empty());
    }

    #[test]
    fn test_key_moment_prefers_name_action() {
        let section = "The sky was glowing pink over the hills. Mia quietly climbed onto the old stone wall. Everyone cheered.";
        assert_eq!(
            HeuristicKeyMoment.extract_key_moment(section, "Mia"),
            "Mia quietly climbed onto the old stone wall."
        );
    }

    #[test]
    fn test_key_moment_progressive_verb() {
        let section = "It was late. The owls were hooting softly in the tall pines. Nobody moved.";
        assert_eq!(
            HeuristicKeyMoment.extract_key_moment(section, "Leo"),
            "The owls were hooting softly in the tall pines."
        );
    }

    #[test]
    fn test_key_moment_first_long_sentence() {
        let section = "Hi. The red balloon floated over the town square. Bye.";
        assert_eq!(
            HeuristicKeyMoment.extract_key_moment(section, "Leo"),
            "The red balloon floated over the town square."
        );
    }

    #[test]
    fn test_key_moment_leading_characters() {
        // Every sentence is too short to stand alone
        let section = "Go! Hop! ".repeat(40);
        let moment = HeuristicKeyMoment.extract_key_moment(&section, "Leo");
        assert_eq!(moment.chars().count(), KEY_MOMENT_FALLBACK_CHARS);
        assert!(moment.starts_with("Go! Hop!"));
    }

    #[test]
    fn test_overrides_apply_to_every_scene() {
        let story: Vec<String> = (1..=5).map(paragraph).collect();
        let scenes = extract_scenes_from_story(
            &story.join("\n\n"),
            "Fox",
            "Forest",
            None,
            false,
            StyleOverrides::default()
                .with_art_style(ArtStyle::ModernFlat)
                .with_mood(Mood::Cozy),
        );
        assert_eq!(scenes.len(), 5);
        assert!(scenes.iter().all(|s| s.art_style == ArtStyle::ModernFlat));
        assert!(scenes.iter().all(|s| s.mood == Mood::Cozy));
        assert_eq!(
            scenes.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert!(scenes[2].illustration_prompt.contains("illustration 3 of 5"));
    }

    struct FirstWord;

    impl KeyMomentExtractor for FirstWord {
        fn extract_key_moment(&self, section: &str, _child_name: &str) -> String {
            section.split_whitespace().next().unwrap_or_default().to_string()
        }
    }

    #[test]
    fn test_custom_extractor() {
        let story: Vec<String> = (1..=5).map(paragraph).collect();
        let scenes = ScenePlanner::new(Box::new(FirstWord)).plan(
            &story.join("\n\n"),
            "Fox",
            "Forest",
            None,
            true,
            StyleOverrides::default(),
        );
        assert!(scenes.iter().all(|s| s.key_moment == "In"));
    }
}
