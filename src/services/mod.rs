// src/services/mod.rs
use crate::errors::RolecastError;
use crate::models::GenerationRequest;
use async_trait::async_trait;

pub mod gemini_service;
pub mod image_processor;
pub mod prompt;

pub use gemini_service::GeminiService;
pub use image_processor::ImageProcessor;

/// Upstream image generation. Returns the base64 PNG the provider produced.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, RolecastError>;
}
