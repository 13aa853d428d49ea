//! Request and response types for text and image providers.

use serde::{Deserialize, Serialize};

/// A rendered text-completion request handed to a text provider.
///
/// # Examples
///
/// ```
/// use fablewright_core::CompletionRequest;
///
/// let request = CompletionRequest::builder()
///     .prompt("Write a story about a brave fox.")
///     .system("You are a children's author.")
///     .max_tokens(800u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.max_tokens, 800);
/// assert_eq!(request.temperature, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct CompletionRequest {
    /// System instruction, when the provider supports one
    #[builder(default, setter(into, strip_option))]
    pub system: Option<String>,
    /// User prompt
    pub prompt: String,
    /// Maximum number of tokens to generate
    #[builder(default = "2048")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[builder(default, setter(into, strip_option))]
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Start building a completion request.
    pub fn builder() -> CompletionRequestBuilder {
        CompletionRequestBuilder::default()
    }

    /// A prompt-only request with default limits.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens: 2048,
            temperature: None,
        }
    }
}

/// Requested illustration shape.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageSize {
    /// 1:1
    #[default]
    Square,
    /// Taller than wide
    Portrait,
    /// Wider than tall
    Landscape,
}

impl ImageSize {
    /// Pixel dimensions `(width, height)` used by providers that take free-form sizes.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ImageSize::Square => (1024, 1024),
            ImageSize::Portrait => (1024, 1792),
            ImageSize::Landscape => (1792, 1024),
        }
    }
}

/// Rendering hint forwarded to providers that accept one.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageStyle {
    /// Saturated, dramatic rendering
    Vivid,
    /// Softer, more literal rendering
    Natural,
}

/// An image generation request.
///
/// # Examples
///
/// ```
/// use fablewright_core::{ImageGenerationRequest, ImageSize};
///
/// let request = ImageGenerationRequest::builder()
///     .prompt("A lighthouse at dawn")
///     .size(ImageSize::Landscape)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.count, 1);
/// assert_eq!(request.size.dimensions(), (1792, 1024));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ImageGenerationRequest {
    /// Image prompt
    pub prompt: String,
    /// Number of images requested
    #[builder(default = "1")]
    pub count: u8,
    /// Requested size
    #[builder(default)]
    pub size: ImageSize,
    /// Optional style hint
    #[builder(default, setter(into, strip_option))]
    pub style: Option<ImageStyle>,
}

impl ImageGenerationRequest {
    /// Start building an image request.
    pub fn builder() -> ImageGenerationRequestBuilder {
        ImageGenerationRequestBuilder::default()
    }

    /// A single image of the given size for `prompt`.
    pub fn single(prompt: impl Into<String>, size: ImageSize) -> Self {
        Self {
            prompt: prompt.into(),
            count: 1,
            size,
            style: None,
        }
    }
}

/// One image returned by an image provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Hosted URL or `data:` URL
    pub url: String,
    /// Prompt as rewritten by the provider, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

impl GeneratedImage {
    /// Image with only a URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            revised_prompt: None,
        }
    }
}

/// An image handed to a provider for analysis.
///
/// # Examples
///
/// ```
/// use fablewright_core::ImageInput;
///
/// let image = ImageInput::Base64 {
///     mime_type: "image/png".to_string(),
///     data: "iVBORw0KGgo".to_string(),
/// };
/// assert_eq!(image.as_url(), "data:image/png;base64,iVBORw0KGgo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageInput {
    /// URL the provider fetches itself
    Url(String),
    /// Inline base64 payload
    Base64 {
        /// MIME type such as `image/jpeg`
        mime_type: String,
        /// Base64-encoded bytes
        data: String,
    },
}

impl ImageInput {
    /// Render as a URL, using a `data:` URL for inline payloads.
    pub fn as_url(&self) -> String {
        match self {
            ImageInput::Url(url) => url.clone(),
            ImageInput::Base64 { mime_type, data } => {
                format!("data:{};base64,{}", mime_type, data)
            }
        }
    }
}
