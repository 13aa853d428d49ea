//! Stability AI text-to-image generation.

use crate::ProviderSettings;
use crate::http::{empty_output, missing_key, send_json};
use async_trait::async_trait;
use fablewright_core::{Capabilities, GeneratedImage, ImageGenerationRequest, ImageSize};
use fablewright_error::{ProviderError, ProviderErrorKind, ProviderResult};
use fablewright_interface::StoryProvider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

const PROVIDER: &str = "stability";
const DEFAULT_ENGINE: &str = "stable-diffusion-xl-1024-v1-0";

/// Prompts longer than this are rejected by the endpoint.
const MAX_PROMPT_CHARS: usize = 2000;

#[derive(Debug, Serialize)]
struct TextToImageRequest<'a> {
    text_prompts: Vec<TextPrompt<'a>>,
    width: u32,
    height: u32,
    samples: u8,
    cfg_scale: f32,
    steps: u32,
}

#[derive(Debug, Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
    weight: f32,
}

#[derive(Debug, Deserialize)]
struct TextToImageResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    base64: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Stability AI REST client.
#[derive(Debug, Clone)]
pub struct StabilityClient {
    client: Client,
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    engine: String,
}

impl StabilityClient {
    /// Create a client from settings, reading the API key from the environment.
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        debug!("Creating new Stability client");
        Self {
            client: Client::new(),
            api_key: settings.api_key(),
            api_key_env: settings.api_key_env.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            engine: settings
                .image_model
                .clone()
                .unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
        }
    }
}

/// SDXL only accepts a fixed set of dimensions.
fn engine_dimensions(size: ImageSize) -> (u32, u32) {
    match size {
        ImageSize::Square => (1024, 1024),
        ImageSize::Portrait => (896, 1152),
        ImageSize::Landscape => (1152, 896),
    }
}

#[async_trait]
impl StoryProvider for StabilityClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            text: false,
            image: true,
            image_analysis: false,
        }
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self, request), fields(engine = %self.engine, count = request.count))]
    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> ProviderResult<Vec<GeneratedImage>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| missing_key(PROVIDER, &self.api_key_env))?;

        if request.prompt.chars().count() > MAX_PROMPT_CHARS {
            return Err(ProviderError::new(ProviderErrorKind::BadRequest(format!(
                "prompt exceeds {} characters",
                MAX_PROMPT_CHARS
            )))
            .with_provider(PROVIDER));
        }

        let (width, height) = engine_dimensions(request.size);
        let body = TextToImageRequest {
            text_prompts: vec![TextPrompt {
                text: &request.prompt,
                weight: 1.0,
            }],
            width,
            height,
            samples: request.count.max(1),
            cfg_scale: 7.0,
            steps: 30,
        };

        let response: TextToImageResponse = send_json(
            PROVIDER,
            self.client
                .post(format!(
                    "{}/generation/{}/text-to-image",
                    self.base_url, self.engine
                ))
                .bearer_auth(key)
                .header(reqwest::header::ACCEPT, "application/json")
                .json(&body),
        )
        .await?;

        let images: Vec<GeneratedImage> = response
            .artifacts
            .into_iter()
            .filter(|artifact| match artifact.finish_reason.as_deref() {
                Some("SUCCESS") | None => true,
                Some(reason) => {
                    warn!(reason, "Dropping filtered Stability artifact");
                    false
                }
            })
            .map(|artifact| {
                GeneratedImage::from_url(format!("data:image/png;base64,{}", artifact.base64))
            })
            .collect();

        if images.is_empty() {
            return Err(empty_output(PROVIDER, "usable artifacts"));
        }
        Ok(images)
    }
}
