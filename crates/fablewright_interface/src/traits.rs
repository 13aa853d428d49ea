//! Trait definitions for text and image backends.

use async_trait::async_trait;
use fablewright_core::{
    Capabilities, Capability, CompletionRequest, GeneratedImage, ImageGenerationRequest,
    ImageInput, ProviderDescriptor,
};
use fablewright_error::{ProviderError, ProviderErrorKind, ProviderResult};

/// Core trait every text or image backend implements.
///
/// Providers are stateless request handlers. Operations a provider does not
/// declare in [`capabilities`](StoryProvider::capabilities) keep their default
/// implementation, which fails with [`ProviderErrorKind::Unsupported`].
#[async_trait]
pub trait StoryProvider: Send + Sync {
    /// Provider name (e.g., "openai", "stability").
    fn name(&self) -> &str;

    /// Declared capability flags.
    fn capabilities(&self) -> Capabilities;

    /// Whether the credentials this provider needs are present.
    fn is_available(&self) -> bool {
        true
    }

    /// Descriptor combining name, capabilities and availability.
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(self.name(), self.capabilities(), self.is_available())
    }

    /// Generate narrative text.
    async fn generate_text(&self, _request: &CompletionRequest) -> ProviderResult<String> {
        Err(unsupported(self.name(), Capability::Text))
    }

    /// Generate one or more images.
    async fn generate_images(
        &self,
        _request: &ImageGenerationRequest,
    ) -> ProviderResult<Vec<GeneratedImage>> {
        Err(unsupported(self.name(), Capability::Image))
    }

    /// Describe an image in text.
    async fn analyze_image(&self, _image: &ImageInput, _prompt: &str) -> ProviderResult<String> {
        Err(unsupported(self.name(), Capability::ImageAnalysis))
    }
}

#[track_caller]
fn unsupported(provider: &str, capability: Capability) -> ProviderError {
    ProviderError::new(ProviderErrorKind::Unsupported(capability.to_string()))
        .with_provider(provider)
}
