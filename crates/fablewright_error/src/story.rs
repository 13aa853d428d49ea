//! Story orchestration error types.

/// Specific error conditions for illustrated book generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StoryErrorKind {
    /// The text provider returned an empty narrative
    #[display("Generated narrative is empty")]
    EmptyNarrative,
    /// Scene planning produced no scenes
    #[display("No scenes could be extracted from the narrative")]
    NoScenes,
    /// Every scene's illustration failed
    #[display("All {} scene illustrations failed; last error: {}", scenes, last_error)]
    AllIllustrationsFailed {
        /// Number of scenes attempted
        scenes: usize,
        /// Rendering of the last per-scene failure
        last_error: String,
    },
    /// The caller supplied an unusable request
    #[display("Invalid story request: {}", _0)]
    InvalidRequest(String),
}

/// Error type for story orchestration.
///
/// # Examples
///
/// ```
/// use fablewright_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::EmptyNarrative);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
