//! Google Gemini `generateContent` REST API: narrative text and image analysis.

use crate::ProviderSettings;
use crate::http::{empty_output, missing_key, send, send_json, transport_error};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fablewright_core::{Capabilities, CompletionRequest, ImageInput};
use fablewright_error::ProviderResult;
use fablewright_interface::StoryProvider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const PROVIDER: &str = "gemini";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini REST client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    text_model: String,
    vision_model: String,
}

impl GeminiClient {
    /// Create a client from settings, reading the API key from the environment.
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        debug!("Creating new Gemini client");
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

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> ProviderResult<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| missing_key(PROVIDER, &self.api_key_env))?;

        let response: GenerateContentResponse = send_json(
            PROVIDER,
            self.client
                .post(format!("{}/models/{}:generateContent", self.base_url, model))
                .header("x-goog-api-key", key)
                .json(request),
        )
        .await?;

        let text: String = response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(empty_output(PROVIDER, "candidate text"));
        }
        Ok(text)
    }

    /// Gemini only accepts inline image bytes, so URLs are fetched first.
    async fn inline_image(&self, image: &ImageInput) -> ProviderResult<InlineData> {
        match image {
            ImageInput::Base64 { mime_type, data } => Ok(InlineData {
                mime_type: mime_type.clone(),
                data: data.clone(),
            }),
            ImageInput::Url(url) => {
                let response = send(PROVIDER, self.client.get(url)).await?;
                let mime_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("image/jpeg")
                    .to_string();
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| transport_error(PROVIDER, e))?;
                Ok(InlineData {
                    mime_type,
                    data: STANDARD.encode(&bytes),
                })
            }
        }
    }
}

#[async_trait]
impl StoryProvider for GeminiClient {
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
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part::Text {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: request.system.as_ref().map(|system| Content {
                role: None,
                parts: vec![Part::Text {
                    text: system.clone(),
                }],
            }),
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        };

        self.generate_content(&self.text_model, &body).await
    }

    #[instrument(skip(self, image, prompt), fields(model = %self.vision_model))]
    async fn analyze_image(&self, image: &ImageInput, prompt: &str) -> ProviderResult<String> {
        let inline_data = self.inline_image(image).await?;
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![
                    Part::Inline { inline_data },
                    Part::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
            system_instruction: None,
            generation_config: GenerationConfig {
                max_output_tokens: 500,
                temperature: None,
            },
        };

        self.generate_content(&self.vision_model, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part::Inline {
                    inline_data: InlineData {
                        mime_type: "image/png".to_string(),
                        data: "AAAA".to_string(),
                    },
                }],
            }],
            system_instruction: None,
            generation_config: GenerationConfig {
                max_output_tokens: 100,
                temperature: Some(0.5),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 100);
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/png");
        assert!(json.get("systemInstruction").is_none());
    }
}
