//! Provider identity and capability descriptors.

use serde::{Deserialize, Serialize};

/// Provider types that can appear in the configured preference lists.
///
/// # Examples
///
/// ```
/// use fablewright_core::ProviderKind;
/// use std::str::FromStr;
///
/// assert_eq!(ProviderKind::from_str("OpenAI").unwrap(), ProviderKind::OpenAi);
/// assert_eq!(ProviderKind::Stability.to_string(), "stability");
/// assert!(ProviderKind::from_str("carrier-pigeon").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProviderKind {
    /// OpenAI chat completions and image generation
    OpenAi,
    /// Anthropic messages API
    Anthropic,
    /// Google Gemini generateContent API
    Gemini,
    /// Stability AI text-to-image
    Stability,
}

/// The two generation channels a provider list is configured for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Channel {
    /// Narrative text and image analysis
    Text,
    /// Illustration generation
    Image,
}

/// A single operation a provider may declare support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Capability {
    /// Generate narrative text
    #[strum(serialize = "text generation")]
    Text,
    /// Produce images from a prompt
    #[strum(serialize = "image generation")]
    Image,
    /// Describe an image in text
    #[strum(serialize = "image analysis")]
    ImageAnalysis,
}

/// Capability flags declared by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    /// Supports text generation
    pub text: bool,
    /// Supports image generation
    pub image: bool,
    /// Supports image analysis
    pub image_analysis: bool,
}

impl Capabilities {
    /// Whether the given capability is declared.
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Text => self.text,
            Capability::Image => self.image,
            Capability::ImageAnalysis => self.image_analysis,
        }
    }
}

/// Identity, capabilities and availability of one provider.
///
/// Availability is derived from present credentials each time a provider is
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ProviderDescriptor {
    /// Provider name used in logs and error tags
    name: String,
    /// Declared capabilities
    capabilities: Capabilities,
    /// Whether credentials are present
    available: bool,
}

impl ProviderDescriptor {
    /// Create a descriptor.
    pub fn new(name: impl Into<String>, capabilities: Capabilities, available: bool) -> Self {
        Self {
            name: name.into(),
            capabilities,
            available,
        }
    }

    /// Whether the provider is available and declares the capability.
    pub fn can(&self, capability: Capability) -> bool {
        self.available && self.capabilities.supports(capability)
    }
}
