//! Scenes, pages and the assembled illustrated book.

use crate::{ArtStyle, Mood};
use serde::{Deserialize, Serialize};

/// One narrative segment destined for exactly one illustration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// 1-based position in the story
    pub index: usize,
    /// Narrative slice
    pub text: String,
    /// The single moment chosen for illustration
    pub key_moment: String,
    /// Finished image prompt
    pub illustration_prompt: String,
    /// Art style shared by the whole story
    pub art_style: ArtStyle,
    /// Mood detected for this scene
    pub mood: Mood,
}

/// A rendered page. An empty `illustration_url` marks a failed illustration.
///
/// # Examples
///
/// ```
/// use fablewright_core::BookPage;
///
/// let page = BookPage::new(3, "The rocket lifted off.", "");
/// assert!(!page.has_illustration());
///
/// let json = serde_json::to_value(&page).unwrap();
/// assert_eq!(json["pageNumber"], 3);
/// assert_eq!(json["illustration_url"], "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPage {
    /// Page number, equal to the scene index
    #[serde(rename = "pageNumber")]
    pub page_number: usize,
    /// Narrative text for the page
    pub text: String,
    /// Illustration URL, or empty when the illustration failed
    pub illustration_url: String,
}

impl BookPage {
    /// Create a page.
    pub fn new(
        page_number: usize,
        text: impl Into<String>,
        illustration_url: impl Into<String>,
    ) -> Self {
        Self {
            page_number,
            text: text.into(),
            illustration_url: illustration_url.into(),
        }
    }

    /// Whether the page carries an illustration.
    pub fn has_illustration(&self) -> bool {
        !self.illustration_url.is_empty()
    }
}

/// Result of a successful orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IllustratedBook {
    /// Full generated narrative
    pub content: String,
    /// Illustrated pages in page-number order
    pub book_pages: Vec<BookPage>,
    /// Every planned scene, including ones whose illustration failed
    pub scenes: Vec<Scene>,
}
