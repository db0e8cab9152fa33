// src/services/image_processor.rs
use crate::models::{GenerationRequest, Role};
use crate::services::prompt;
use base64::{Engine as _, engine::general_purpose};

pub const DEFAULT_MIME: &str = "image/png";

/// Turns a raw upload into the provider-ready request.
pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, data: &[u8]) -> String {
        general_purpose::STANDARD.encode(data)
    }

    pub fn normalize_mime(&self, declared: Option<&str>) -> String {
        declared
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MIME.to_string())
    }

    pub fn build_request(
        &self,
        data: &[u8],
        declared_mime: Option<&str>,
        role: Role,
    ) -> GenerationRequest {
        self.build_request_with_token(data, declared_mime, role, &prompt::variation_token())
    }

    pub fn build_request_with_token(
        &self,
        data: &[u8],
        declared_mime: Option<&str>,
        role: Role,
        token: &str,
    ) -> GenerationRequest {
        GenerationRequest {
            role,
            image_base64: self.encode(data),
            mime_type: self.normalize_mime(declared_mime),
            system_guard: prompt::SYSTEM_GUARD.to_string(),
            instruction: prompt::user_instruction(role, token),
        }
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_round_trips_exact_bytes() {
        let processor = ImageProcessor::new();
        let bytes: Vec<u8> = (0..=255u8).chain([0, 0, 255, 10, 13]).collect();
        let req = processor.build_request(&bytes, Some("image/webp"), Role::Blogger);
        let decoded = general_purpose::STANDARD.decode(&req.image_base64).unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn mime_defaults_to_png_and_is_lowercased() {
        let processor = ImageProcessor::new();
        assert_eq!(processor.normalize_mime(None), "image/png");
        assert_eq!(processor.normalize_mime(Some("")), "image/png");
        assert_eq!(processor.normalize_mime(Some("IMAGE/HEIC")), "image/heic");
    }

    #[test]
    fn request_combines_guard_and_role_instruction() {
        let req = ImageProcessor::new().build_request_with_token(
            b"img",
            Some("image/jpeg"),
            Role::Journalist,
            "tok123",
        );
        assert_eq!(req.system_guard, prompt::SYSTEM_GUARD);
        assert!(req.instruction.starts_with(prompt::role_template(Role::Journalist)));
        assert!(req.instruction.contains("tok123"));
        assert_eq!(req.mime_type, "image/jpeg");
    }
}
