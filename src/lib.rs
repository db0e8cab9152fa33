// src/lib.rs
use std::sync::Arc;

pub mod client;
pub mod config;
pub mod cors;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

use crate::services::{ImageGenerator, ImageProcessor};

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn ImageGenerator>,
    pub image_processor: Arc<ImageProcessor>,
    pub max_upload_bytes: usize,
}
