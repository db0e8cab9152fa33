// src/client/mod.rs
// Client half of the pipeline: capture, submission and watermarking.
use thiserror::Error;

pub mod session;
pub mod submitter;
pub mod watermark;

pub use session::CaptureSession;
pub use submitter::Submitter;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    #[error("Upload your photo (JPG/PNG/WEBP/HEIC)")]
    Image,
    #[error("Choose a role: journalist / blogger / photographer")]
    Role,
}

/// Everything that can end a generation attempt. Each renders as one line
/// for the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("{0}")]
    MissingInput(MissingInput),

    #[error("The API is not configured (ROLECAST_API_BASE)")]
    Misconfiguration,

    #[error("The API host does not accept POST. Check the URL in ROLECAST_API_BASE")]
    HostingMisconfigured,

    #[error("{0}")]
    ProxyError(String),

    #[error("Unsupported image: {0} (use JPG, PNG, WEBP or HEIC)")]
    UnsupportedImage(String),

    #[error("Could not read the photo: {0}")]
    InvalidUpload(String),

    #[error("Network error: {0}")]
    Transport(String),
}

impl From<MissingInput> for SubmitError {
    fn from(missing: MissingInput) -> Self {
        SubmitError::MissingInput(missing)
    }
}

/// One user-initiated attempt: validate, submit, stamp the logo, record the
/// outcome. The watermark is best effort; a failed overlay keeps the plain image.
pub async fn generate(
    session: CaptureSession,
    submitter: &Submitter,
    logo: Option<&[u8]>,
) -> CaptureSession {
    let session = session.begin_submit();
    if !session.in_flight() {
        return session;
    }

    let outcome = submitter
        .submit(session.image(), session.role())
        .await
        .map(|generated| watermark::stamp(generated, logo));

    session.finish(outcome)
}
