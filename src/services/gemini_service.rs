// src/services/gemini_service.rs
use crate::config::ProxyConfig;
use crate::errors::RolecastError;
use crate::models::GenerationRequest;
use crate::services::ImageGenerator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    data: &'a str,
    mime_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestPart<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ProviderError>,
}

/// Error object Gemini sends alongside a non-2xx status.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderError {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<ResponseInlineData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseInlineData {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    /// The first inline image, or `NoImage` with whatever text the model sent.
    pub fn into_image(self) -> Result<String, RolecastError> {
        if let Some(data) = self
            .parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| !d.data.is_empty())
        {
            return Ok(data.data.clone());
        }

        let mut text: Vec<String> = self
            .parts()
            .filter_map(|p| p.text.clone())
            .filter(|t| !t.is_empty())
            .collect();
        if text.is_empty() {
            text.extend(self.error.and_then(|e| e.message));
        }
        Err(RolecastError::no_image(text))
    }
}

pub struct GeminiService {
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
    client: Client,
}

impl GeminiService {
    pub fn new(config: &ProxyConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn payload<'a>(&self, request: &'a GenerationRequest) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![
                RequestContent {
                    role: "user",
                    parts: vec![
                        RequestPart {
                            text: Some(&request.system_guard),
                            inline_data: None,
                        },
                        RequestPart {
                            text: Some(&request.instruction),
                            inline_data: None,
                        },
                    ],
                },
                RequestContent {
                    role: "user",
                    parts: vec![RequestPart {
                        text: None,
                        inline_data: Some(InlineData {
                            data: &request.image_base64,
                            mime_type: &request.mime_type,
                        }),
                    }],
                },
            ],
            generation_config: GenerationConfig {
                response_mime_type: "image/png",
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait]
impl ImageGenerator for GeminiService {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, RolecastError> {
        log::info!(
            "Requesting {} portrait from {} ({} base64 chars)",
            request.role,
            self.model,
            request.image_base64.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.payload(request))
            .send()
            .await
            .map_err(|e| RolecastError::Provider(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        log::info!("Gemini responded with {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| RolecastError::Provider(format!("Failed to read Gemini response: {}", e)))?;

        // Error statuses still carry a JSON body; it goes through the same
        // image scan and ends up as NO_IMAGE with the provider's message.
        let result: GenerateContentResponse = match serde_json::from_str(&body) {
            Ok(result) => result,
            Err(_) if !status.is_success() => {
                return Err(RolecastError::Provider(format!(
                    "Gemini error {}: {}",
                    status, body
                )));
            }
            Err(e) => {
                return Err(RolecastError::Serialization(format!(
                    "Failed to parse Gemini response: {}",
                    e
                )));
            }
        };

        result.into_image()
    }
}
