// src/client/session.rs
use crate::client::{MissingInput, SubmitError};
use crate::models::{GeneratedImage, ImageMime, Role, UploadedImage};
use std::path::Path;

/// Client-side state of one page visit. Every transition consumes the old
/// state and returns the new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureSession {
    image: Option<UploadedImage>,
    role: Option<Role>,
    result: Option<GeneratedImage>,
    error: Option<String>,
    in_flight: bool,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new upload always discards the previous result and error.
    pub fn set_image(mut self, image: Option<UploadedImage>) -> Self {
        if let Some(image) = image {
            self.image = Some(image);
            self.result = None;
            self.error = None;
        }
        self
    }

    /// Ignored until an image is present.
    pub fn set_role(mut self, role: Role) -> Self {
        if self.image.is_some() {
            self.role = Some(role);
        }
        self
    }

    pub fn can_submit(&self) -> bool {
        self.image.is_some() && self.role.is_some() && !self.in_flight
    }

    pub fn begin_submit(mut self) -> Self {
        if self.in_flight {
            return self;
        }
        let missing = if self.image.is_none() {
            Some(MissingInput::Image)
        } else if self.role.is_none() {
            Some(MissingInput::Role)
        } else {
            None
        };
        self.result = None;
        match missing {
            Some(missing) => self.error = Some(missing.to_string()),
            None => {
                self.error = None;
                self.in_flight = true;
            }
        }
        self
    }

    pub fn finish(mut self, outcome: Result<GeneratedImage, SubmitError>) -> Self {
        self.in_flight = false;
        match outcome {
            Ok(image) => {
                self.result = Some(image);
                self.error = None;
            }
            Err(e) => {
                self.result = None;
                self.error = Some(e.to_string());
            }
        }
        self
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn result(&self) -> Option<&GeneratedImage> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }
}

/// Reads a photo from disk, accepting only the allow-listed formats.
pub fn load_upload(path: &Path) -> Result<UploadedImage, SubmitError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let mime = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageMime::from_extension)
        .ok_or_else(|| SubmitError::UnsupportedImage(file_name.clone()))?;

    let data = std::fs::read(path)
        .map_err(|e| SubmitError::InvalidUpload(format!("{}: {}", path.display(), e)))?;

    Ok(UploadedImage {
        file_name,
        mime,
        data,
    })
}
