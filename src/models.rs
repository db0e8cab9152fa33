// src/models.rs
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Journalist,
    Blogger,
    Photographer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Journalist, Role::Blogger, Role::Photographer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Journalist => "journalist",
            Role::Blogger => "blogger",
            Role::Photographer => "photographer",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.as_str() == value.trim())
    }

    /// Role named by a form field; anything unrecognised selects the default.
    pub fn from_form(value: Option<&str>) -> Role {
        value.and_then(Role::parse).unwrap_or_default()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload types accepted by the capture step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Png,
    Jpeg,
    Webp,
    Heic,
    Heif,
}

impl ImageMime {
    pub fn as_mime(&self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Webp => "image/webp",
            ImageMime::Heic => "image/heic",
            ImageMime::Heif => "image/heif",
        }
    }

    pub fn from_extension(ext: &str) -> Option<ImageMime> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageMime::Png),
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            "webp" => Some(ImageMime::Webp),
            "heic" => Some(ImageMime::Heic),
            "heif" => Some(ImageMime::Heif),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub file_name: String,
    pub mime: ImageMime,
    pub data: Vec<u8>,
}

/// Everything the provider call needs. Built once per request and dropped
/// after the upstream call returns.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub role: Role,
    pub image_base64: String,
    pub mime_type: String,
    pub system_guard: String,
    pub instruction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(rename = "imageBase64")]
    pub image_base64: String,
}

/// A PNG returned by the proxy, possibly watermarked.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub role: Role,
    pub png: Vec<u8>,
}

impl GeneratedImage {
    pub fn data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(&self.png)
        )
    }

    pub fn download_name(&self) -> String {
        format!("image-{}.png", self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_or_missing_role_falls_back_to_journalist() {
        assert_eq!(Role::from_form(None), Role::Journalist);
        assert_eq!(Role::from_form(Some("astronaut")), Role::Journalist);
        assert_eq!(Role::from_form(Some("")), Role::Journalist);
        assert_eq!(Role::from_form(Some("blogger")), Role::Blogger);
        assert_eq!(Role::from_form(Some("photographer")), Role::Photographer);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Photographer).unwrap(),
            "\"photographer\""
        );
    }

    #[test]
    fn allow_list_covers_heic_family() {
        assert_eq!(ImageMime::from_extension("HEIF"), Some(ImageMime::Heif));
        assert_eq!(ImageMime::from_extension("heic").map(|m| m.as_mime()), Some("image/heic"));
        assert_eq!(ImageMime::from_extension("JPG"), Some(ImageMime::Jpeg));
        assert_eq!(ImageMime::from_extension("gif"), None);
        assert_eq!(ImageMime::from_extension("bmp"), None);
    }

    #[test]
    fn generated_image_download_artifact() {
        let img = GeneratedImage {
            role: Role::Blogger,
            png: vec![1, 2, 3],
        };
        assert_eq!(img.download_name(), "image-blogger.png");
        assert_eq!(img.data_url(), "data:image/png;base64,AQID");
    }

    #[test]
    fn generate_response_uses_camel_case_field() {
        let body = serde_json::to_value(GenerateResponse {
            image_base64: "abc".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "imageBase64": "abc" }));
    }
}
