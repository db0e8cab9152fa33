// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

pub const NO_IMAGE_FALLBACK: &str = "The model did not return an image";

/// Failures of the generation proxy. Every variant renders as
/// `{ "error": ..., "details"?: ... }`.
#[derive(Error, Debug)]
pub enum RolecastError {
    #[error("NO_FILE")]
    NoFile,

    #[error("FILE_TOO_LARGE")]
    FileTooLarge { limit: usize },

    #[error("NO_IMAGE")]
    NoImage { details: String },

    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RolecastError {
    pub fn no_image(text_parts: Vec<String>) -> Self {
        let details = text_parts.join("\n");
        RolecastError::NoImage {
            details: if details.trim().is_empty() {
                NO_IMAGE_FALLBACK.to_string()
            } else {
                details
            },
        }
    }
}

impl ResponseError for RolecastError {
    fn status_code(&self) -> StatusCode {
        match self {
            RolecastError::NoFile => StatusCode::BAD_REQUEST,
            RolecastError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            RolecastError::NoFile => serde_json::json!({ "error": "NO_FILE" }),
            RolecastError::FileTooLarge { limit } => serde_json::json!({
                "error": "FILE_TOO_LARGE",
                "details": format!("Upload exceeds {} bytes", limit)
            }),
            RolecastError::NoImage { details } => serde_json::json!({
                "error": "NO_IMAGE",
                "details": details
            }),
            other => serde_json::json!({ "error": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<actix_multipart::MultipartError> for RolecastError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        RolecastError::Multipart(e.to_string())
    }
}
