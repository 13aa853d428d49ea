//! Scripted in-memory provider.

use async_trait::async_trait;
use fablewright_core::{
    Capabilities, CompletionRequest, GeneratedImage, ImageGenerationRequest, ImageInput,
};
use fablewright_error::{ProviderError, ProviderErrorKind, ProviderResult};
use fablewright_interface::StoryProvider;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How the mock answers each call.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always succeed with this output
    Succeed(String),
    /// Always fail with this kind
    Fail(ProviderErrorKind),
    /// Fail on these 1-based call numbers, succeed with the output otherwise
    FailOnCalls {
        /// Failing call numbers
        calls: Vec<usize>,
        /// Error returned on those calls
        kind: ProviderErrorKind,
        /// Output for every other call
        output: String,
    },
    /// Sleep far past any fallback deadline
    Hang,
    /// Succeed with empty text, or with one image whose URL is empty
    Empty,
}

/// A [`StoryProvider`] that follows a [`MockBehavior`] and counts calls.
#[derive(Debug, Clone)]
pub struct MockProvider {
    name: String,
    capabilities: Capabilities,
    available: bool,
    behavior: MockBehavior,
    calls: Arc<AtomicUsize>,
    prompts: Arc<std::sync::Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Mock with explicit capabilities.
    pub fn new(name: &str, capabilities: Capabilities, behavior: MockBehavior) -> Self {
        Self {
            name: name.to_string(),
            capabilities,
            available: true,
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Text-only mock.
    pub fn text(name: &str, behavior: MockBehavior) -> Self {
        Self::new(
            name,
            Capabilities {
                text: true,
                image: false,
                image_analysis: false,
            },
            behavior,
        )
    }

    /// Text and image-analysis mock.
    pub fn vision(name: &str, behavior: MockBehavior) -> Self {
        Self::new(
            name,
            Capabilities {
                text: true,
                image: false,
                image_analysis: true,
            },
            behavior,
        )
    }

    /// Image-generation mock.
    pub fn image(name: &str, behavior: MockBehavior) -> Self {
        Self::new(
            name,
            Capabilities {
                text: false,
                image: true,
                image_analysis: false,
            },
            behavior,
        )
    }

    /// Report the provider as unavailable.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Calls received so far across all operations.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    async fn respond(&self, prompt: &str) -> ProviderResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.behavior {
            MockBehavior::Succeed(output) => Ok(output.clone()),
            MockBehavior::Fail(kind) => Err(ProviderError::new(kind.clone())),
            MockBehavior::FailOnCalls {
                calls,
                kind,
                output,
            } => {
                if calls.contains(&call) {
                    Err(ProviderError::new(kind.clone()))
                } else {
                    Ok(output.clone())
                }
            }
            MockBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
            MockBehavior::Empty => Ok(String::new()),
        }
    }
}

#[async_trait]
impl StoryProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn generate_text(&self, request: &CompletionRequest) -> ProviderResult<String> {
        self.respond(&request.prompt).await
    }

    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> ProviderResult<Vec<GeneratedImage>> {
        let url = self.respond(&request.prompt).await?;
        if matches!(self.behavior, MockBehavior::Empty) {
            return Ok(vec![GeneratedImage::from_url("")]);
        }
        Ok(vec![GeneratedImage::from_url(format!(
            "{}/{}.png",
            url,
            self.call_count()
        ))])
    }

    async fn analyze_image(&self, _image: &ImageInput, prompt: &str) -> ProviderResult<String> {
        self.respond(prompt).await
    }
}
