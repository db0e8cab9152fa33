// src/client/submitter.rs
use crate::client::{MissingInput, SubmitError};
use crate::config::ClientConfig;
use crate::handlers::GENERATE_PATH;
use crate::models::{GeneratedImage, Role, UploadedImage};
use base64::{Engine as _, engine::general_purpose};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

// Error bodies from static hosts that refuse POST.
const HOSTING_REJECTION_MARKERS: [&str; 2] = ["UnsupportedHttpVerb", "<Error>"];

pub struct Submitter {
    api_base: Option<String>,
    client: Client,
}

impl Submitter {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            api_base: config.api_base.clone(),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> Result<String, SubmitError> {
        let base = self
            .api_base
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or(SubmitError::Misconfiguration)?;
        Ok(format!("{}{}", base.trim_end_matches('/'), GENERATE_PATH))
    }

    /// Sends one generation request. Never retries.
    pub async fn submit(
        &self,
        image: Option<&UploadedImage>,
        role: Option<Role>,
    ) -> Result<GeneratedImage, SubmitError> {
        let image = image.ok_or(MissingInput::Image)?;
        let role = role.ok_or(MissingInput::Role)?;
        let url = self.endpoint()?;

        let part = Part::bytes(image.data.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime.as_mime())
            .map_err(|e| SubmitError::InvalidUpload(e.to_string()))?;
        let form = Form::new()
            .part("image", part)
            .text("role", role.as_str());

        log::info!("Submitting {} ({} bytes) as {}", image.file_name, image.data.len(), role);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if !status.is_success() {
            log::warn!("Proxy answered {}", status);
            return Err(classify_failure(status, &body));
        }

        parse_success(role, &body)
    }
}

/// Status code decides first; the body markers are only a hint for hosts
/// that answer a rejected POST with some other status.
pub fn classify_failure(status: StatusCode, body: &str) -> SubmitError {
    if status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_IMPLEMENTED {
        return SubmitError::HostingMisconfigured;
    }
    if status.is_client_error() && HOSTING_REJECTION_MARKERS.iter().any(|m| body.contains(m)) {
        return SubmitError::HostingMisconfigured;
    }
    if body.trim().is_empty() {
        return SubmitError::ProxyError(format!("The API answered with HTTP {}", status));
    }
    SubmitError::ProxyError(body.to_string())
}

pub fn parse_success(role: Role, body: &str) -> Result<GeneratedImage, SubmitError> {
    let result: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| SubmitError::ProxyError(format!("Malformed API response: {}", e)))?;

    let image_base64 = result["imageBase64"]
        .as_str()
        .ok_or_else(|| SubmitError::ProxyError("No imageBase64 in API response".to_string()))?;

    let png = general_purpose::STANDARD
        .decode(image_base64)
        .map_err(|e| SubmitError::ProxyError(format!("Malformed imageBase64: {}", e)))?;

    Ok(GeneratedImage { role, png })
}
