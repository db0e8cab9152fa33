// src/client/watermark.rs
use crate::models::GeneratedImage;
use image::{DynamicImage, GenericImageView, ImageFormat as ImgFormat, imageops};
use reqwest::Client;

pub const LOGO_WIDTH_RATIO: f64 = 0.12;
pub const BOTTOM_MARGIN_RATIO: f64 = 0.03;
pub const LOGO_OPACITY: f32 = 0.92;

/// Bundled logo used unless another one is configured.
pub const DEFAULT_LOGO: &[u8] = include_bytes!("../../assets/logo.png");

/// Where the logo lands on the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

// Halves round towards positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Logo is 12% of the base width, keeps its own aspect ratio, sits centred
/// horizontally with its bottom edge 3% of the base height above the bottom.
pub fn placement(base_width: u32, base_height: u32, logo_width: u32, logo_height: u32) -> Placement {
    let base_w = base_width as f64;
    let base_h = base_height as f64;
    let ratio = logo_width.max(1) as f64 / logo_height.max(1) as f64;

    let target_w = round_half_up(base_w * LOGO_WIDTH_RATIO);
    let target_h = round_half_up(target_w / ratio);

    Placement {
        x: round_half_up((base_w - target_w) / 2.0) as i64,
        y: round_half_up(base_h - target_h - base_h * BOTTOM_MARGIN_RATIO) as i64,
        width: target_w as u32,
        height: target_h as u32,
    }
}

fn try_composite(base: &[u8], logo: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    let base = image::load_from_memory(base)?;
    let logo = image::load_from_memory(logo)?;

    let (base_w, base_h) = base.dimensions();
    let (logo_w, logo_h) = logo.dimensions();
    let spot = placement(base_w, base_h, logo_w, logo_h);

    let mut canvas = base.to_rgba8();
    if spot.width > 0 && spot.height > 0 {
        let mut mark = imageops::resize(
            &logo.to_rgba8(),
            spot.width,
            spot.height,
            imageops::FilterType::Lanczos3,
        );
        for px in mark.pixels_mut() {
            px[3] = (px[3] as f32 * LOGO_OPACITY).round() as u8;
        }
        imageops::overlay(&mut canvas, &mark, spot.x, spot.y);
    }

    let mut output = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut std::io::Cursor::new(&mut output), ImgFormat::Png)?;
    Ok(output)
}

/// PNG bytes of `base` with the logo drawn on top, or `None` if either
/// image cannot be decoded.
pub fn composite(base: &[u8], logo: &[u8]) -> Option<Vec<u8>> {
    match try_composite(base, logo) {
        Ok(png) => Some(png),
        Err(e) => {
            log::warn!("Watermark skipped: {}", e);
            None
        }
    }
}

/// Applies the logo if possible; otherwise hands back the image untouched.
pub fn stamp(image: GeneratedImage, logo: Option<&[u8]>) -> GeneratedImage {
    let Some(logo) = logo else {
        log::warn!("No logo available, keeping the plain image");
        return image;
    };
    match composite(&image.png, logo) {
        Some(png) => GeneratedImage { png, ..image },
        None => image,
    }
}

/// Reads the logo from a local path or an http(s) URL. Failures are logged
/// and yield `None`.
pub async fn load_logo(client: &Client, source: &str) -> Option<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let response = match client.get(source).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Could not fetch logo {}: {}", source, e);
                return None;
            }
        };
        if !response.status().is_success() {
            log::warn!("Logo {} answered {}", source, response.status());
            return None;
        }
        return match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                log::warn!("Could not read logo {}: {}", source, e);
                None
            }
        };
    }

    match tokio::fs::read(source).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Could not read logo {}: {}", source, e);
            None
        }
    }
}

/// The configured logo, or the bundled one when nothing is configured. A
/// configured logo that cannot be read yields `None` rather than the default.
pub async fn resolve_logo(client: &Client, source: Option<&str>) -> Option<Vec<u8>> {
    match source {
        Some(source) => load_logo(client, source).await,
        None => Some(DEFAULT_LOGO.to_vec()),
    }
}
