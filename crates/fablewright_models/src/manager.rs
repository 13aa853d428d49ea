//! Unified text, image and image-analysis operations over ordered providers.

use crate::{FablewrightConfig, LlmMetrics, ProviderSlot, build_provider};
use fablewright_core::{
    Capability, Channel, CompletionRequest, GeneratedImage, ImageGenerationRequest, ImageInput,
    ProviderDescriptor,
};
use fablewright_error::{ProviderError, ProviderErrorKind, ProviderResult};
use fablewright_interface::StoryProvider;
use fablewright_retry::{Candidate, FallbackOptions, retry_with_fallback};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Prompt used by [`ProviderManager::analyze_image`] when none is given.
pub const DEFAULT_ANALYSIS_PROMPT: &str = "Describe the person in this image for a children's \
     book illustrator: apparent age, skin tone, hair color and style, eye color, and any \
     distinctive features. Use one short, kind paragraph and do not guess names.";

/// Holds the ordered text and image providers and fans requests out to them.
///
/// Built once per process and shared read-only; it keeps no per-request state.
///
/// # Examples
///
/// ```no_run
/// use fablewright_core::CompletionRequest;
/// use fablewright_models::{FablewrightConfig, ProviderManager};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = ProviderManager::from_config(&FablewrightConfig::load()?);
/// let text = manager
///     .generate_text(&CompletionRequest::from_prompt("Tell a story about a kind dragon."))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProviderManager {
    text: Vec<Arc<dyn StoryProvider>>,
    image: Vec<Arc<dyn StoryProvider>>,
    skipped: Vec<(Channel, ProviderSlot)>,
    fallback: FallbackOptions,
}

impl ProviderManager {
    /// Create a manager over injected providers, in preference order.
    pub fn new(text: Vec<Arc<dyn StoryProvider>>, image: Vec<Arc<dyn StoryProvider>>) -> Self {
        Self {
            text,
            image,
            skipped: Vec::new(),
            fallback: FallbackOptions::default(),
        }
    }

    /// Replace the fallback deadline and per-provider retry budget.
    pub fn with_fallback_options(mut self, fallback: FallbackOptions) -> Self {
        self.fallback = fallback;
        self
    }

    /// Build both channels from the configured provider lists.
    ///
    /// Providers without credentials are kept aside for [`describe`](Self::describe)
    /// and never become candidates.
    #[instrument(skip(config))]
    pub fn from_config(config: &FablewrightConfig) -> Self {
        let mut skipped = Vec::new();
        let mut collect = |channel: Channel, kinds: Vec<fablewright_core::ProviderKind>| {
            kinds
                .into_iter()
                .filter_map(|kind| match build_provider(kind, config) {
                    ProviderSlot::Available(provider) => Some(provider),
                    slot => {
                        warn!(%channel, provider = %kind, ?slot, "Skipping unavailable provider");
                        skipped.push((channel, slot));
                        None
                    }
                })
                .collect::<Vec<_>>()
        };

        let text = collect(Channel::Text, config.text_providers());
        let image = collect(Channel::Image, config.image_providers());

        info!(
            text = text.len(),
            image = image.len(),
            skipped = skipped.len(),
            "Provider manager ready"
        );

        Self {
            text,
            image,
            skipped,
            fallback: config.fallback.clone(),
        }
    }

    /// Text-channel providers in preference order.
    pub fn text_providers(&self) -> &[Arc<dyn StoryProvider>] {
        &self.text
    }

    /// Image-channel providers in preference order.
    pub fn image_providers(&self) -> &[Arc<dyn StoryProvider>] {
        &self.image
    }

    /// Active fallback options.
    pub fn fallback_options(&self) -> &FallbackOptions {
        &self.fallback
    }

    /// Fail fast when no available provider on `channel` supports `capability`.
    ///
    /// # Errors
    ///
    /// [`ProviderErrorKind::NoProviders`] naming the capability and channel.
    pub fn require(&self, channel: Channel, capability: Capability) -> ProviderResult<()> {
        let providers = match channel {
            Channel::Text => &self.text,
            Channel::Image => &self.image,
        };
        if capable(providers, capability).is_empty() {
            return Err(no_providers(channel, capability));
        }
        Ok(())
    }

    /// Every configured provider per channel, unavailable ones included.
    pub fn describe(&self) -> Vec<(Channel, ProviderDescriptor)> {
        let mut rows: Vec<(Channel, ProviderDescriptor)> = self
            .text
            .iter()
            .map(|p| (Channel::Text, p.descriptor()))
            .chain(self.image.iter().map(|p| (Channel::Image, p.descriptor())))
            .collect();
        rows.extend(
            self.skipped
                .iter()
                .map(|(channel, slot)| (*channel, slot.descriptor())),
        );
        rows
    }

    /// Generate narrative text with fallback across text providers.
    ///
    /// # Errors
    ///
    /// [`ProviderErrorKind::NoProviders`] when no text provider is configured,
    /// otherwise the exhaustion error from the last provider tried.
    #[instrument(skip(self, request), fields(prompt_len = request.prompt.len()))]
    pub async fn generate_text(&self, request: &CompletionRequest) -> ProviderResult<String> {
        let providers = capable(&self.text, Capability::Text);
        if providers.is_empty() {
            return Err(no_providers(Channel::Text, Capability::Text));
        }

        let candidates = providers
            .iter()
            .map(|provider| {
                candidate(Arc::clone(provider), "generate_text", move |p| {
                    Box::pin(async move { p.generate_text(request).await })
                })
            })
            .collect();

        self.run(&providers, candidates).await
    }

    /// Describe an image, with fallback across analysis-capable text providers.
    ///
    /// # Errors
    ///
    /// [`ProviderErrorKind::Unsupported`] when no text provider declares image
    /// analysis, otherwise the exhaustion error from the last provider tried.
    #[instrument(skip(self, image, prompt))]
    pub async fn analyze_image(
        &self,
        image: &ImageInput,
        prompt: Option<&str>,
    ) -> ProviderResult<String> {
        if self.text.is_empty() {
            return Err(no_providers(Channel::Text, Capability::ImageAnalysis));
        }
        let providers = capable(&self.text, Capability::ImageAnalysis);
        if providers.is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::Unsupported(format!(
                "{} (no configured provider declares it)",
                Capability::ImageAnalysis
            ))));
        }

        let prompt = prompt.unwrap_or(DEFAULT_ANALYSIS_PROMPT);
        let candidates = providers
            .iter()
            .map(|provider| {
                candidate(Arc::clone(provider), "analyze_image", move |p| {
                    Box::pin(async move { p.analyze_image(image, prompt).await })
                })
            })
            .collect();

        self.run(&providers, candidates).await
    }

    /// Generate images with fallback across image providers.
    ///
    /// # Errors
    ///
    /// [`ProviderErrorKind::NoProviders`] when no image provider is configured,
    /// otherwise the exhaustion error from the last provider tried.
    #[instrument(skip(self, request), fields(size = %request.size, count = request.count))]
    pub async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> ProviderResult<Vec<GeneratedImage>> {
        let providers = capable(&self.image, Capability::Image);
        if providers.is_empty() {
            return Err(no_providers(Channel::Image, Capability::Image));
        }

        let candidates = providers
            .iter()
            .map(|provider| {
                candidate(Arc::clone(provider), "generate_images", move |p| {
                    Box::pin(async move { p.generate_images(request).await })
                })
            })
            .collect();

        self.run(&providers, candidates).await
    }

    async fn run<'a, T>(
        &self,
        providers: &[Arc<dyn StoryProvider>],
        candidates: Vec<Candidate<'a, T>>,
    ) -> ProviderResult<T> {
        let outcome = retry_with_fallback(candidates, &self.fallback).await?;
        let name = providers
            .get(outcome.provider_index)
            .map(|p| p.name())
            .unwrap_or("unknown");
        info!(
            provider_index = outcome.provider_index,
            provider = name,
            "Request satisfied"
        );
        Ok(outcome.result)
    }
}

impl std::fmt::Debug for ProviderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |list: &[Arc<dyn StoryProvider>]| {
            list.iter().map(|p| p.name().to_string()).collect::<Vec<_>>()
        };
        f.debug_struct("ProviderManager")
            .field("text", &names(&self.text))
            .field("image", &names(&self.image))
            .field("skipped", &self.skipped)
            .field("fallback", &self.fallback)
            .finish()
    }
}

fn capable(
    providers: &[Arc<dyn StoryProvider>],
    capability: Capability,
) -> Vec<Arc<dyn StoryProvider>> {
    providers
        .iter()
        .filter(|p| {
            let ok = p.descriptor().can(capability);
            if !ok {
                debug!(provider = p.name(), %capability, "Provider not eligible");
            }
            ok
        })
        .cloned()
        .collect()
}

#[track_caller]
fn no_providers(channel: Channel, capability: Capability) -> ProviderError {
    ProviderError::new(ProviderErrorKind::NoProviders(format!(
        "{} ({} channel)",
        capability, channel
    )))
}

/// Wrap one provider call as a fallback candidate that tags errors and records metrics.
fn candidate<'a, T, F>(
    provider: Arc<dyn StoryProvider>,
    operation: &'static str,
    call: F,
) -> Candidate<'a, T>
where
    T: Send + 'a,
    F: Fn(Arc<dyn StoryProvider>) -> BoxFuture<'a, ProviderResult<T>> + Send + Sync + 'a,
{
    Box::new(move || {
        let provider = Arc::clone(&provider);
        let future = call(Arc::clone(&provider));
        Box::pin(measured(provider, operation, future))
    })
}

async fn measured<T>(
    provider: Arc<dyn StoryProvider>,
    operation: &'static str,
    future: impl Future<Output = ProviderResult<T>>,
) -> ProviderResult<T> {
    let started = Instant::now();
    let name = provider.name().to_string();
    match future.await {
        Ok(value) => {
            LlmMetrics::get().record_request(&name, operation, started.elapsed().as_secs_f64());
            Ok(value)
        }
        Err(e) => {
            LlmMetrics::get().record_error(&name, operation, e.kind().label());
            Err(match e.provider() {
                Some(_) => e,
                None => e.with_provider(name),
            })
        }
    }
}
