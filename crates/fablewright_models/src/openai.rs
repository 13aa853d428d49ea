//! OpenAI chat completions, vision and image generation.

use crate::ProviderSettings;
use crate::http::{empty_output, missing_key, send_json};
use async_trait::async_trait;
use fablewright_core::{
    Capabilities, CompletionRequest, GeneratedImage, ImageGenerationRequest, ImageInput, ImageSize,
};
use fablewright_error::ProviderResult;
use fablewright_interface::StoryProvider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const PROVIDER: &str = "openai";
const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_VISION_MODEL: &str = "gpt-4o";
const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: ChatContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ChatContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

/// OpenAI API client covering text, image analysis and image generation.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    text_model: String,
    vision_model: String,
    image_model: String,
}

impl OpenAiClient {
    /// Create a client from settings, reading the API key from the environment.
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        debug!("Creating new OpenAI client");
        Self {
            client: Client::new(),
            api_key: settings.api_key(),
            api_key_env: settings.api_key_env.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            text_model: settings
                .text_model
                .clone()
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            vision_model: settings
                .vision_model
                .clone()
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            image_model: settings
                .image_model
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
        }
    }

    fn key(&self) -> ProviderResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| missing_key(PROVIDER, &self.api_key_env))
    }

    async fn chat(&self, request: &ChatRequest<'_>) -> ProviderResult<String> {
        let key = self.key()?;
        let response: ChatResponse = send_json(
            PROVIDER,
            self.client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(key)
                .json(request),
        )
        .await?;

        response
            .choices
            .into_iter()
            .filter_map(|choice| choice.message.content)
            .find(|text| !text.trim().is_empty())
            .ok_or_else(|| empty_output(PROVIDER, "completion text"))
    }
}

fn size_param(size: ImageSize) -> String {
    let (width, height) = size.dimensions();
    format!("{}x{}", width, height)
}

#[async_trait]
impl StoryProvider for OpenAiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            text: true,
            image: true,
            image_analysis: true,
        }
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self, request), fields(model = %self.text_model))]
    async fn generate_text(&self, request: &CompletionRequest) -> ProviderResult<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: ChatContent::Text(system),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: ChatContent::Text(&request.prompt),
        });

        self.chat(&ChatRequest {
            model: &self.text_model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        })
        .await
    }

    #[instrument(skip(self, request), fields(model = %self.image_model, count = request.count))]
    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> ProviderResult<Vec<GeneratedImage>> {
        let key = self.key()?;
        let body = ImagesRequest {
            model: &self.image_model,
            prompt: &request.prompt,
            n: request.count.max(1),
            size: size_param(request.size),
            style: request.style.map(|s| s.to_string()),
        };

        let response: ImagesResponse = send_json(
            PROVIDER,
            self.client
                .post(format!("{}/images/generations", self.base_url))
                .bearer_auth(key)
                .json(&body),
        )
        .await?;

        let images: Vec<GeneratedImage> = response
            .data
            .into_iter()
            .filter_map(|datum| {
                let url = datum.url.or_else(|| {
                    datum
                        .b64_json
                        .map(|b64| format!("data:image/png;base64,{}", b64))
                })?;
                Some(GeneratedImage {
                    url,
                    revised_prompt: datum.revised_prompt,
                })
            })
            .collect();

        if images.is_empty() {
            return Err(empty_output(PROVIDER, "images"));
        }
        Ok(images)
    }

    #[instrument(skip(self, image, prompt), fields(model = %self.vision_model))]
    async fn analyze_image(&self, image: &ImageInput, prompt: &str) -> ProviderResult<String> {
        let message = ChatMessage {
            role: "user",
            content: ChatContent::Parts(vec![
                ContentPart::Text { text: prompt },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.as_url(),
                    },
                },
            ]),
        };

        self.chat(&ChatRequest {
            model: &self.vision_model,
            messages: vec![message],
            max_tokens: 500,
            temperature: None,
        })
        .await
    }
}
