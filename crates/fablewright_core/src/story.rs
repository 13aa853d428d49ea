//! Story parameters supplied by the calling layer.

use serde::{Deserialize, Serialize};

/// One child the story is written about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildProfile {
    /// Child's first name
    pub name: String,
    /// Personality adjectives chosen for the child
    #[serde(default)]
    pub adjectives: Vec<String>,
}

impl ChildProfile {
    /// Create a profile.
    pub fn new<I, S>(name: impl Into<String>, adjectives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            adjectives: adjectives.into_iter().map(Into::into).collect(),
        }
    }
}

/// Who the story is about. Single and group stories are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorySubject {
    /// A story about one child
    Single(ChildProfile),
    /// A story shared by several children
    Group(Vec<ChildProfile>),
}

impl StorySubject {
    /// All children in story order.
    pub fn children(&self) -> Vec<&ChildProfile> {
        match self {
            StorySubject::Single(child) => vec![child],
            StorySubject::Group(children) => children.iter().collect(),
        }
    }

    /// True when more than one child takes part.
    pub fn is_multi_child(&self) -> bool {
        matches!(self, StorySubject::Group(children) if children.len() > 1)
    }

    /// Names joined for prose: `Mia`, `Mia and Leo`, `Mia, Leo and Sam`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fablewright_core::{ChildProfile, StorySubject};
    ///
    /// let group = StorySubject::Group(vec![
    ///     ChildProfile::new("Mia", ["brave"]),
    ///     ChildProfile::new("Leo", ["silly"]),
    ///     ChildProfile::new("Sam", ["kind"]),
    /// ]);
    /// assert_eq!(group.display_name(), "Mia, Leo and Sam");
    /// ```
    pub fn display_name(&self) -> String {
        let names: Vec<&str> = self.children().iter().map(|c| c.name.as_str()).collect();
        match names.as_slice() {
            [] => String::new(),
            [only] => (*only).to_string(),
            [init @ .., last] => format!("{} and {}", init.join(", "), last),
        }
    }

    /// Every adjective across all children, in order.
    pub fn all_adjectives(&self) -> Vec<&str> {
        self.children()
            .iter()
            .flat_map(|c| c.adjectives.iter().map(String::as_str))
            .collect()
    }
}

/// Narrative generation parameters.
///
/// # Examples
///
/// ```
/// use fablewright_core::{ChildProfile, StorySubject, TextGenerationRequest};
///
/// let request = TextGenerationRequest::builder()
///     .subject(StorySubject::Single(ChildProfile::new("Ava", ["curious"])))
///     .theme("Space")
///     .moral("Asking questions is brave")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.theme, "Space");
/// assert!(request.prompt_override.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct TextGenerationRequest {
    /// The child or children the story is about
    pub subject: StorySubject,
    /// Story theme, e.g. `Space` or `Dinosaurs`
    pub theme: String,
    /// Optional lesson the story should convey
    #[builder(default, setter(into, strip_option))]
    pub moral: Option<String>,
    /// Optional story template id
    #[builder(default, setter(into, strip_option))]
    pub template_id: Option<String>,
    /// Raw prompt used verbatim instead of the built one
    #[builder(default, setter(into, strip_option))]
    pub prompt_override: Option<String>,
}

impl TextGenerationRequest {
    /// Start building a text generation request.
    pub fn builder() -> TextGenerationRequestBuilder {
        TextGenerationRequestBuilder::default()
    }
}

/// Reading-age band controlling length and vocabulary.
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
#[strum(serialize_all = "kebab-case")]
pub enum AgeBand {
    /// Ages 0-2
    Toddler,
    /// Ages 3-5
    #[default]
    Preschool,
    /// Ages 6-7
    EarlyElementary,
    /// Ages 8 and up
    Elementary,
}

impl AgeBand {
    /// Band for a child's age; unknown ages fall back to [`AgeBand::Preschool`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fablewright_core::AgeBand;
    ///
    /// assert_eq!(AgeBand::from_age(Some(2)), AgeBand::Toddler);
    /// assert_eq!(AgeBand::from_age(Some(6)), AgeBand::EarlyElementary);
    /// assert_eq!(AgeBand::from_age(None), AgeBand::Preschool);
    /// ```
    pub fn from_age(age: Option<u8>) -> Self {
        match age {
            Some(0..=2) => AgeBand::Toddler,
            Some(3..=5) => AgeBand::Preschool,
            Some(6..=7) => AgeBand::EarlyElementary,
            Some(_) => AgeBand::Elementary,
            None => AgeBand::default(),
        }
    }
}
