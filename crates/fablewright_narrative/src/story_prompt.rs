//! Narrative prompt construction.
//!
//! A pure template fill: no provider is called here. The prompt encodes a
//! three-act scaffold sized to the reader's age band, an emotional arc chosen
//! from theme and adjective keywords, and sensory hints for the theme.

use fablewright_core::{
    AgeBand, ChildProfile, CompletionRequest, StorySubject, TextGenerationRequest,
};
use tracing::{debug, warn};

/// Sampling temperature for narrative generation.
pub const STORY_TEMPERATURE: f32 = 0.8;

/// System instruction sent with every narrative request.
pub const STORY_SYSTEM_PROMPT: &str = "You are a warm, imaginative children's book author. \
     You write gentle, age-appropriate stories with vivid pictures in every paragraph, \
     and you never include frightening, violent or unkind content.";

/// Length and language guidance for one age band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct AgeGuidance {
    /// Band this guidance applies to
    band: AgeBand,
    /// Target story length in words
    target_words: u32,
    /// Vocabulary instruction
    vocabulary: &'static str,
    /// Sentence-complexity instruction
    sentences: &'static str,
}

static AGE_GUIDANCE: [AgeGuidance; 4] = [
    AgeGuidance {
        band: AgeBand::Toddler,
        target_words: 200,
        vocabulary: "Use very simple words of one or two syllables and repeat key words and sounds.",
        sentences: "Keep sentences very short, three to six words each.",
    },
    AgeGuidance {
        band: AgeBand::Preschool,
        target_words: 400,
        vocabulary: "Use simple, familiar words; any new word should be clear from context.",
        sentences: "Use short sentences of five to ten words, mostly one idea each.",
    },
    AgeGuidance {
        band: AgeBand::EarlyElementary,
        target_words: 700,
        vocabulary: "Use everyday vocabulary with a few richer describing words.",
        sentences: "Mix simple and compound sentences, with a little dialogue.",
    },
    AgeGuidance {
        band: AgeBand::Elementary,
        target_words: 1000,
        vocabulary: "Use varied vocabulary with vivid verbs and some gentle figurative language.",
        sentences: "Vary sentence length; complex sentences and dialogue are welcome.",
    },
];

/// Guidance row for an age band.
pub fn age_guidance(band: AgeBand) -> &'static AgeGuidance {
    AGE_GUIDANCE
        .iter()
        .find(|g| g.band == band)
        .unwrap_or(&AGE_GUIDANCE[1])
}

/// Emotional journey the story follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionalArc {
    /// Short arc name
    pub name: &'static str,
    /// Where the hero starts emotionally
    pub start: &'static str,
    /// Where the hero ends emotionally
    pub finish: &'static str,
}

/// Arc used when no keyword matches.
pub const DEFAULT_ARC: EmotionalArc = EmotionalArc {
    name: "Challenge to Triumph",
    start: "facing a problem that seems too big",
    finish: "proud after solving it with their own strengths",
};

const ARC_TABLE: &[(&[&str], EmotionalArc)] = &[
    (
        &["brave", "courage", "courageous", "fear", "scared", "dark", "shy"],
        EmotionalArc {
            name: "Fear to Courage",
            start: "nervous or unsure",
            finish: "brave and confident",
        },
    ),
    (
        &["friend", "friendship", "share", "sharing", "kind", "kindness", "lonely"],
        EmotionalArc {
            name: "Loneliness to Belonging",
            start: "feeling left out or alone",
            finish: "surrounded by friends who care",
        },
    ),
    (
        &["curious", "curiosity", "learn", "learning", "school", "science", "discover"],
        EmotionalArc {
            name: "Curiosity to Discovery",
            start: "full of questions",
            finish: "delighted by what they found out",
        },
    ),
    (
        &["lost", "home", "family", "missing"],
        EmotionalArc {
            name: "Lost to Found",
            start: "far from what feels familiar",
            finish: "safe and warm where they belong",
        },
    ),
    (
        &["patient", "patience", "wait", "waiting", "grow", "garden"],
        EmotionalArc {
            name: "Frustration to Patience",
            start: "impatient and frustrated",
            finish: "calm and rewarded for waiting",
        },
    ),
];

/// Pick the arc whose keywords first match the theme or an adjective.
///
/// Rows are tested in table order; within a row any keyword may match.
///
/// # Examples
///
/// ```
/// use fablewright_narrative::{select_emotional_arc, DEFAULT_ARC};
///
/// assert_eq!(select_emotional_arc("Space", &["brave"]).name, "Fear to Courage");
/// assert_eq!(select_emotional_arc("Space", &["tall"]), DEFAULT_ARC);
/// ```
pub fn select_emotional_arc(theme: &str, adjectives: &[&str]) -> EmotionalArc {
    let words: Vec<String> = std::iter::once(theme)
        .chain(adjectives.iter().copied())
        .flat_map(|s| s.split(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    ARC_TABLE
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| words.iter().any(|w| w == k)))
        .map(|(_, arc)| *arc)
        .unwrap_or(DEFAULT_ARC)
}

const SENSORY_TABLE: &[(&str, &[&str])] = &[
    (
        "space",
        &["twinkling stars", "the hum of the rocket", "floating weightless", "cool moon dust"],
    ),
    (
        "ocean",
        &["salty breeze", "waves whooshing on the sand", "shimmering fish", "smooth shells"],
    ),
    (
        "forest",
        &["crunching leaves", "pine scent", "birdsong in the branches", "dappled sunlight"],
    ),
    (
        "dinosaurs",
        &["thundering footsteps", "giant ferns", "warm volcanic rocks", "a distant roar"],
    ),
    (
        "fantasy",
        &["sparkling dust", "a castle on a hill", "soft dragon scales", "bells in the wind"],
    ),
    (
        "magic",
        &["glowing wands", "whispered spells", "shimmering light", "the smell of old books"],
    ),
    (
        "robots",
        &["whirring gears", "blinking lights", "smooth metal", "cheerful beeps"],
    ),
    (
        "superhero",
        &["a flapping cape", "city lights below", "the rush of wind", "a heroic pose"],
    ),
    (
        "animals",
        &["soft fur", "happy chirps", "muddy paw prints", "a wagging tail"],
    ),
    (
        "farm",
        &["fresh hay", "clucking hens", "a red barn", "warm milk"],
    ),
];

const GENERIC_SENSORY: &[&str] = &[
    "bright colors",
    "gentle sounds",
    "interesting textures",
    "delicious smells",
];

/// Sensory detail hints for a theme, or a generic set for unknown themes.
pub fn sensory_details(theme: &str) -> &'static [&'static str] {
    let theme = theme.trim().to_lowercase();
    SENSORY_TABLE
        .iter()
        .find(|(key, _)| theme == *key || theme.contains(key))
        .map(|(_, hints)| *hints)
        .unwrap_or(GENERIC_SENSORY)
}

/// Structural guidance for a named story template.
pub fn template_guidance(template_id: &str) -> Option<&'static str> {
    match template_id.trim().to_lowercase().as_str() {
        "bedtime" => Some(
            "This is a bedtime story: keep the pace gentle, let the adventure wind down \
             in the final act, and end with the hero cozy and ready for sleep.",
        ),
        "adventure" => Some(
            "This is an adventure story: include a journey to a new place, one surprising \
             obstacle, and a triumphant return.",
        ),
        "friendship" => Some(
            "This is a friendship story: introduce a new friend early, give them a \
             misunderstanding to work through, and end with a shared moment of joy.",
        ),
        "learning" => Some(
            "This is a learning story: weave one simple, true fact about the theme into \
             the plot so the reader learns it alongside the hero.",
        ),
        _ => None,
    }
}

fn describe_child(child: &ChildProfile) -> String {
    if child.adjectives.is_empty() {
        child.name.clone()
    } else {
        format!("{}, who is {}", child.name, join_words(&child.adjectives))
    }
}

fn join_words<S: AsRef<str>>(words: &[S]) -> String {
    match words {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => format!(
            "{} and {}",
            init.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", "),
            last.as_ref()
        ),
    }
}

/// Build the narrative instruction text.
///
/// # Examples
///
/// ```
/// use fablewright_core::{AgeBand, ChildProfile, StorySubject, TextGenerationRequest};
/// use fablewright_narrative::build_story_prompt;
///
/// let request = TextGenerationRequest::builder()
///     .subject(StorySubject::Single(ChildProfile::new("Mia", ["brave", "curious"])))
///     .theme("Space")
///     .build()
///     .unwrap();
///
/// let prompt = build_story_prompt(&request, AgeBand::Preschool);
/// assert!(prompt.contains("Mia"));
/// assert!(prompt.contains("about 400 words"));
/// assert!(prompt.contains("Fear to Courage"));
/// ```
pub fn build_story_prompt(request: &TextGenerationRequest, band: AgeBand) -> String {
    let guidance = age_guidance(band);
    let adjectives = request.subject.all_adjectives();
    let arc = select_emotional_arc(&request.theme, &adjectives);
    let senses = sensory_details(&request.theme);
    let words = guidance.target_words;

    debug!(%band, arc = arc.name, theme = %request.theme, "Building story prompt");

    let mut sections = Vec::new();

    match &request.subject {
        StorySubject::Group(children) if request.subject.is_multi_child() => {
            let cast: Vec<String> = children.iter().map(describe_child).collect();
            sections.push(format!(
                "Write an original children's story about {} {} adventure starring {} children: {}.",
                article(&request.theme),
                request.theme,
                children.len(),
                cast.join("; ")
            ));
            sections.push(
                "Every child must get their own distinct moment in the story where one of \
                 their traits makes a difference. Do not let one child do everything, and \
                 make sure each name appears in more than one paragraph."
                    .to_string(),
            );
        }
        subject => {
            let hero = subject
                .children()
                .first()
                .map(|c| describe_child(c))
                .unwrap_or_default();
            sections.push(format!(
                "Write an original children's story about {} {} adventure starring {}.",
                article(&request.theme),
                request.theme,
                hero
            ));
        }
    }

    sections.push(format!(
        "The reader is in the {} age band. Aim for about {} words. {} {}",
        band, words, guidance.vocabulary, guidance.sentences
    ));

    sections.push(format!(
        "Structure the story in three acts:\n\
         1. Setup (about {} words): introduce {} and the world of the story.\n\
         2. Rising action (about {} words): a challenge appears and grows.\n\
         3. Climax and resolution (about {} words): the challenge is met and the story ends happily.",
        words / 4,
        request.subject.display_name(),
        words / 2,
        words / 4
    ));

    sections.push(format!(
        "Emotional arc: \"{}\". The hero begins {} and ends {}.",
        arc.name, arc.start, arc.finish
    ));

    sections.push(format!(
        "Bring the {} setting to life with sensory details such as {}.",
        request.theme,
        join_words(senses)
    ));

    if let Some(moral) = request.moral.as_deref().filter(|m| !m.trim().is_empty()) {
        sections.push(format!(
            "Let the story gently show this lesson without stating it as a sermon: {}.",
            moral.trim().trim_end_matches('.')
        ));
    }

    if let Some(id) = request.template_id.as_deref() {
        match template_guidance(id) {
            Some(text) => sections.push(text.to_string()),
            None => warn!(template_id = id, "Unknown story template, ignoring"),
        }
    }

    sections.push(
        "Write 5 to 7 paragraphs separated by blank lines. Each paragraph should describe \
         one picture-worthy moment. Do not include a title, headings or any text other \
         than the story itself."
            .to_string(),
    );

    sections.join("\n\n")
}

fn article(word: &str) -> &'static str {
    match word.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Wrap the narrative prompt in a completion request.
///
/// `prompt_override` replaces the built prompt verbatim. Token limits scale
/// with the age band's target length.
pub fn completion_for(request: &TextGenerationRequest, band: AgeBand) -> CompletionRequest {
    let prompt = match request.prompt_override.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(custom) => {
            debug!("Using prompt override");
            custom.to_string()
        }
        None => build_story_prompt(request, band),
    };

    CompletionRequest {
        system: Some(STORY_SYSTEM_PROMPT.to_string()),
        prompt,
        max_tokens: (age_guidance(band).target_words * 2).max(512),
        temperature: Some(STORY_TEMPERATURE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(subject: StorySubject, theme: &str) -> TextGenerationRequest {
        TextGenerationRequest::builder()
            .subject(subject)
            .theme(theme)
            .build()
            .unwrap()
    }

    #[test]
    fn test_act_lengths_follow_target() {
        let prompt = build_story_prompt(
            &request(StorySubject::Single(ChildProfile::new("Leo", ["kind"])), "Ocean"),
            AgeBand::Elementary,
        );
        assert!(prompt.contains("about 1000 words"));
        assert!(prompt.contains("Setup (about 250 words)"));
        assert!(prompt.contains("Rising action (about 500 words)"));
        assert!(prompt.contains("Climax and resolution (about 250 words)"));
        assert!(prompt.contains("an Ocean adventure"));
        assert!(prompt.contains("salty breeze"));
    }

    #[test]
    fn test_first_matching_arc_wins() {
        // "kind" matches friendship, "brave" matches courage which comes first
        let arc = select_emotional_arc("Forest", &["kind", "brave"]);
        assert_eq!(arc.name, "Fear to Courage");
    }

    #[test]
    fn test_theme_keywords_select_arc() {
        assert_eq!(
            select_emotional_arc("Learning at School", &[]).name,
            "Curiosity to Discovery"
        );
    }

    #[test]
    fn test_unknown_theme_gets_generic_senses() {
        assert_eq!(sensory_details("Underground Bakery"), GENERIC_SENSORY);
    }

    #[test]
    fn test_multi_child_branch() {
        let subject = StorySubject::Group(vec![
            ChildProfile::new("Mia", ["brave"]),
            ChildProfile::new("Sam", ["funny"]),
        ]);
        let prompt = build_story_prompt(&request(subject, "Dinosaurs"), AgeBand::Preschool);
        assert!(prompt.contains("starring 2 children"));
        assert!(prompt.contains("Mia, who is brave"));
        assert!(prompt.contains("Sam, who is funny"));
        assert!(prompt.contains("their own distinct moment"));
        assert!(prompt.contains("introduce Mia and Sam"));
    }

    #[test]
    fn test_single_member_group_uses_single_branch() {
        let subject = StorySubject::Group(vec![ChildProfile::new("Ada", Vec::<String>::new())]);
        let prompt = build_story_prompt(&request(subject, "Robots"), AgeBand::Toddler);
        assert!(prompt.contains("starring Ada."));
        assert!(!prompt.contains("distinct moment"));
    }

    #[test]
    fn test_moral_and_template() {
        let mut req = request(
            StorySubject::Single(ChildProfile::new("Leo", ["sleepy"])),
            "Space",
        );
        req.moral = Some("Sharing makes everyone happier.".into());
        req.template_id = Some("Bedtime".into());
        let prompt = build_story_prompt(&req, AgeBand::Preschool);
        assert!(prompt.contains("Sharing makes everyone happier."));
        assert!(prompt.contains("bedtime story"));
    }

    #[test]
    fn test_unknown_template_is_ignored() {
        let mut req = request(StorySubject::Single(ChildProfile::new("Leo", ["tall"])), "Space");
        let without = build_story_prompt(&req, AgeBand::Preschool);
        req.template_id = Some("limerick".into());
        assert_eq!(build_story_prompt(&req, AgeBand::Preschool), without);
    }

    #[test]
    fn test_completion_for_override() {
        let mut req = request(StorySubject::Single(ChildProfile::new("Leo", ["tall"])), "Space");
        req.prompt_override = Some("Tell me about Leo.".into());
        let completion = completion_for(&req, AgeBand::Toddler);
        assert_eq!(completion.prompt, "Tell me about Leo.");
        assert_eq!(completion.max_tokens, 512);
        assert_eq!(completion.temperature, Some(STORY_TEMPERATURE));
        assert_eq!(completion.system.as_deref(), Some(STORY_SYSTEM_PROMPT));
    }

    #[test]
    fn test_completion_tokens_scale_with_band() {
        let req = request(StorySubject::Single(ChildProfile::new("Leo", ["tall"])), "Space");
        assert_eq!(completion_for(&req, AgeBand::Elementary).max_tokens, 2000);
    }
}
