//! End-to-end illustrated book generation.

use crate::character::resolve_character;
use crate::scenes::{ScenePlanner, StyleOverrides};
use crate::story_prompt::completion_for;
use fablewright_core::{
    AgeBand, BookPage, Capability, Channel, ChildIdentity, IllustratedBook,
    ImageGenerationRequest, ImageInput, ImageSize, TextGenerationRequest,
};
use fablewright_error::{FablewrightResult, StoryError, StoryErrorKind};
use fablewright_models::ProviderManager;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Prompt used to turn a child's photo into an illustration-ready description.
pub const PHOTO_DESCRIPTION_PROMPT: &str = "Describe this child's appearance for a children's \
     book illustrator in one or two sentences: apparent age, skin tone, hair color and style, \
     eye color, and clothing. Be kind and factual. Do not mention the background or guess a name.";

/// Everything needed to produce one illustrated book.
#[derive(Debug, Clone, PartialEq, derive_builder::Builder)]
#[builder(setter(into))]
pub struct BookRequest {
    /// Story parameters
    pub story: TextGenerationRequest,
    /// Identity data for character rendering
    #[builder(default)]
    pub child: ChildIdentity,
    /// Photo to describe when no description is known; used once and dropped
    #[builder(default, setter(into, strip_option))]
    pub photo: Option<ImageInput>,
    /// Story-wide style overrides
    #[builder(default)]
    pub style_overrides: StyleOverrides,
    /// Illustration shape
    #[builder(default)]
    pub image_size: ImageSize,
}

impl BookRequest {
    /// Start building a book request.
    pub fn builder() -> BookRequestBuilder {
        BookRequestBuilder::default()
    }
}

/// Runs the story, character, scene and illustration steps in order.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use fablewright_core::{ChildProfile, StorySubject, TextGenerationRequest};
/// use fablewright_models::{FablewrightConfig, ProviderManager};
/// use fablewright_narrative::{BookRequest, IllustratedBookOrchestrator};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = Arc::new(ProviderManager::from_config(&FablewrightConfig::load()?));
/// let orchestrator = IllustratedBookOrchestrator::new(manager);
///
/// let story = TextGenerationRequest::builder()
///     .subject(StorySubject::Single(ChildProfile::new("Mia", ["brave"])))
///     .theme("Space")
///     .build()?;
/// let book = orchestrator
///     .generate_illustrated_book(&BookRequest::builder().story(story).build()?)
///     .await?;
/// println!("{} pages", book.book_pages.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IllustratedBookOrchestrator {
    manager: Arc<ProviderManager>,
    planner: ScenePlanner,
}

impl IllustratedBookOrchestrator {
    /// Create an orchestrator over a shared provider manager.
    pub fn new(manager: Arc<ProviderManager>) -> Self {
        Self {
            manager,
            planner: ScenePlanner::default(),
        }
    }

    /// Replace the scene planner.
    pub fn with_planner(mut self, planner: ScenePlanner) -> Self {
        self.planner = planner;
        self
    }

    /// Provider manager in use.
    pub fn manager(&self) -> &ProviderManager {
        &self.manager
    }

    /// Describe a child's photo through an image-analysis provider.
    #[instrument(skip(self, photo))]
    pub async fn describe_photo(&self, photo: &ImageInput) -> FablewrightResult<String> {
        let description = self
            .manager
            .analyze_image(photo, Some(PHOTO_DESCRIPTION_PROMPT))
            .await?;
        Ok(description.trim().to_string())
    }

    /// Fill in a photo description when one is needed and a photo was given.
    async fn identity_for(&self, request: &BookRequest) -> ChildIdentity {
        let mut identity = request.child.clone();
        let has_description = identity
            .ai_description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty());

        if let (false, Some(photo)) = (has_description, request.photo.as_ref()) {
            match self.describe_photo(photo).await {
                Ok(description) if !description.is_empty() => {
                    debug!("Derived character description from photo");
                    identity.ai_description = Some(description);
                }
                Ok(_) => warn!("Photo description was empty, using appearance"),
                Err(e) => warn!(error = %e, "Photo description failed, using appearance"),
            }
        }
        identity
    }

    /// Generate the story, plan its scenes and illustrate each one.
    ///
    /// Scenes whose illustration fails are dropped; the remaining pages keep
    /// their original page numbers.
    ///
    /// # Errors
    ///
    /// Fails when the request names no child or theme, when no available
    /// provider can generate images, when every text provider fails, when
    /// the narrative is empty, or when no scene could be illustrated.
    #[instrument(skip(self, request), fields(theme = %request.story.theme))]
    pub async fn generate_illustrated_book(
        &self,
        request: &BookRequest,
    ) -> FablewrightResult<IllustratedBook> {
        let story = &request.story;
        if story.subject.children().is_empty() {
            return Err(StoryError::new(StoryErrorKind::InvalidRequest(
                "story needs at least one child".to_string(),
            ))
            .into());
        }
        if story.theme.trim().is_empty() {
            return Err(StoryError::new(StoryErrorKind::InvalidRequest(
                "story theme is empty".to_string(),
            ))
            .into());
        }

        // No narrative is written when nothing could illustrate it
        self.manager.require(Channel::Image, Capability::Image)?;

        let band = AgeBand::from_age(request.child.age);
        let completion = completion_for(story, band);
        let content = self.manager.generate_text(&completion).await?;
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(StoryError::new(StoryErrorKind::EmptyNarrative).into());
        }
        info!(%band, chars = content.len(), "Narrative generated");

        let identity = self.identity_for(request).await;
        let rendering = resolve_character(&identity);
        info!(tier = %rendering.tier, "Character tier resolved");

        let child_name = story.subject.display_name();
        let scenes = self.planner.plan(
            &content,
            &child_name,
            &story.theme,
            rendering.description.as_deref(),
            rendering.include_character(),
            request.style_overrides,
        );
        if scenes.is_empty() {
            return Err(StoryError::new(StoryErrorKind::NoScenes).into());
        }

        let mut pages = Vec::with_capacity(scenes.len());
        let mut last_error = None;

        for scene in &scenes {
            let image_request =
                ImageGenerationRequest::single(&scene.illustration_prompt, request.image_size);

            let url = match self.manager.generate_images(&image_request).await {
                Ok(images) => match images.into_iter().next() {
                    Some(image) if !image.url.trim().is_empty() => image.url,
                    Some(_) => {
                        warn!(scene = scene.index, "Provider returned an empty image URL");
                        last_error = Some("provider returned an empty image URL".to_string());
                        String::new()
                    }
                    None => {
                        warn!(scene = scene.index, "Provider returned no image");
                        last_error = Some("provider returned no image".to_string());
                        String::new()
                    }
                },
                Err(e) => {
                    warn!(scene = scene.index, error = %e, "Scene illustration failed");
                    last_error = Some(e.to_string());
                    String::new()
                }
            };
            pages.push(BookPage::new(scene.index, &scene.text, url));
        }

        let attempted = pages.len();
        let book_pages: Vec<BookPage> = pages
            .into_iter()
            .filter(BookPage::has_illustration)
            .collect();

        if book_pages.is_empty() {
            return Err(StoryError::new(StoryErrorKind::AllIllustrationsFailed {
                scenes: attempted,
                last_error: last_error.unwrap_or_else(|| "unknown".to_string()),
            })
            .into());
        }

        info!(
            pages = book_pages.len(),
            dropped = attempted - book_pages.len(),
            "Illustrated book assembled"
        );

        Ok(IllustratedBook {
            content,
            book_pages,
            scenes,
        })
    }
}
