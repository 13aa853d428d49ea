//! Provider factories.
//!
//! A factory never fails: a provider that cannot serve requests in this
//! process comes back as [`ProviderSlot::Unavailable`] with the reason.

use crate::{FablewrightConfig, GeminiClient, OpenAiClient, StabilityClient};
use fablewright_core::{ProviderDescriptor, ProviderKind};
use fablewright_interface::StoryProvider;
use std::sync::Arc;
use tracing::debug;

/// Outcome of constructing one provider type.
#[derive(Clone)]
pub enum ProviderSlot {
    /// Constructed and holding credentials
    Available(Arc<dyn StoryProvider>),
    /// Not usable in this process
    Unavailable {
        /// Provider type that was requested
        kind: ProviderKind,
        /// Why it cannot be used
        reason: String,
    },
}

impl ProviderSlot {
    /// Descriptor for display, synthesised for unavailable slots.
    pub fn descriptor(&self) -> ProviderDescriptor {
        match self {
            ProviderSlot::Available(provider) => provider.descriptor(),
            ProviderSlot::Unavailable { kind, .. } => {
                ProviderDescriptor::new(kind.as_ref(), Default::default(), false)
            }
        }
    }

    /// Provider handle when available.
    pub fn into_available(self) -> Option<Arc<dyn StoryProvider>> {
        match self {
            ProviderSlot::Available(provider) => Some(provider),
            ProviderSlot::Unavailable { .. } => None,
        }
    }
}

impl std::fmt::Debug for ProviderSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderSlot::Available(provider) => {
                f.debug_tuple("Available").field(&provider.name()).finish()
            }
            ProviderSlot::Unavailable { kind, reason } => f
                .debug_struct("Unavailable")
                .field("kind", kind)
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Construct the provider for `kind` from configuration.
pub fn build_provider(kind: ProviderKind, config: &FablewrightConfig) -> ProviderSlot {
    let settings = config.settings(kind);

    let provider: Arc<dyn StoryProvider> = match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiClient::from_settings(settings)),
        ProviderKind::Gemini => Arc::new(GeminiClient::from_settings(settings)),
        ProviderKind::Stability => Arc::new(StabilityClient::from_settings(settings)),
        #[cfg(feature = "anthropic")]
        ProviderKind::Anthropic => Arc::new(crate::AnthropicClient::from_settings(settings)),
        #[cfg(not(feature = "anthropic"))]
        ProviderKind::Anthropic => {
            debug!(provider = %kind, "Provider not compiled in");
            return ProviderSlot::Unavailable {
                kind,
                reason: "built without the `anthropic` feature".to_string(),
            };
        }
    };

    if !provider.is_available() {
        debug!(provider = %kind, env = %settings.api_key_env, "Provider has no API key");
        return ProviderSlot::Unavailable {
            kind,
            reason: format!("{} is not set", settings.api_key_env),
        };
    }

    ProviderSlot::Available(provider)
}
