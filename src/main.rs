// src/main.rs
use actix_web::{App, HttpServer, middleware, web};
use log::{error, info};
use std::sync::Arc;

use rolecast::AppState;
use rolecast::config::ProxyConfig;
use rolecast::handlers;
use rolecast::services::{GeminiService, ImageProcessor};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting rolecast generation proxy...");

    let config = match ProxyConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    let app_state = AppState {
        generator: Arc::new(GeminiService::new(&config)),
        image_processor: Arc::new(ImageProcessor::new()),
        max_upload_bytes: config.max_upload_bytes,
    };

    let (host, port) = config.bind_addr();
    info!(
        "Starting HTTP server on {}:{} (model {})",
        host, port, config.model
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
