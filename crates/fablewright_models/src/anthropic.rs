//! Anthropic messages API: narrative text and image analysis.

use crate::ProviderSettings;
use crate::http::{empty_output, missing_key, send_json};
use async_trait::async_trait;
use fablewright_core::{Capabilities, CompletionRequest, ImageInput};
use fablewright_error::ProviderResult;
use fablewright_interface::StoryProvider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const PROVIDER: &str = "anthropic";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Text { text: &'a str },
    Image { source: ImageSource<'a> },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ImageSource<'a> {
    Base64 { media_type: &'a str, data: &'a str },
    Url { url: &'a str },
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    text_model: String,
    vision_model: String,
}

impl AnthropicClient {
    /// Create a client from settings, reading the API key from the environment.
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        debug!("Creating new Anthropic client");
        let text_model = settings
            .text_model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self {
            client: Client::new(),
            api_key: settings.api_key(),
            api_key_env: settings.api_key_env.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            vision_model: settings
                .vision_model
                .clone()
                .unwrap_or_else(|| text_model.clone()),
            text_model,
        }
    }

    async fn messages(&self, request: &MessagesRequest<'_>) -> ProviderResult<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| missing_key(PROVIDER, &self.api_key_env))?;

        let response: MessagesResponse = send_json(
            PROVIDER,
            self.client
                .post(format!("{}/messages", self.base_url))
                .header("x-api-key", key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(request),
        )
        .await?;

        let text: String = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(empty_output(PROVIDER, "text content"));
        }
        Ok(text)
    }
}

#[async_trait]
impl StoryProvider for AnthropicClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            text: true,
            image: false,
            image_analysis: true,
        }
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self, request), fields(model = %self.text_model))]
    async fn generate_text(&self, request: &CompletionRequest) -> ProviderResult<String> {
        self.messages(&MessagesRequest {
            model: &self.text_model,
            max_tokens: request.max_tokens,
            system: request.system.as_deref(),
            temperature: request.temperature,
            messages: vec![Message {
                role: "user",
                content: vec![ContentBlock::Text {
                    text: &request.prompt,
                }],
            }],
        })
        .await
    }

    #[instrument(skip(self, image, prompt), fields(model = %self.vision_model))]
    async fn analyze_image(&self, image: &ImageInput, prompt: &str) -> ProviderResult<String> {
        let source = match image {
            ImageInput::Url(url) => ImageSource::Url { url },
            ImageInput::Base64 { mime_type, data } => ImageSource::Base64 {
                media_type: mime_type,
                data,
            },
        };

        self.messages(&MessagesRequest {
            model: &self.vision_model,
            max_tokens: 500,
            system: None,
            temperature: None,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Image { source },
                    ContentBlock::Text { text: prompt },
                ],
            }],
        })
        .await
    }
}
