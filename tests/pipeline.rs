//! End-to-end: the client submitter talking to a live proxy whose upstream
//! provider is replaced by an in-process fake.

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, web};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use rolecast::AppState;
use rolecast::client::{self, CaptureSession, SubmitError, Submitter};
use rolecast::config::ClientConfig;
use rolecast::errors::RolecastError;
use rolecast::handlers;
use rolecast::models::{GenerationRequest, ImageMime, Role, UploadedImage};
use rolecast::services::{ImageGenerator, ImageProcessor};

fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

struct FixedImage(String);

#[async_trait]
impl ImageGenerator for FixedImage {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, RolecastError> {
        Ok(self.0.clone())
    }
}

struct NoImage;

#[async_trait]
impl ImageGenerator for NoImage {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, RolecastError> {
        Err(RolecastError::no_image(vec!["Cannot edit this photo".into()]))
    }
}

fn spawn_proxy(generator: Arc<dyn ImageGenerator>) -> SocketAddr {
    let state = AppState {
        generator,
        image_processor: Arc::new(ImageProcessor::new()),
        max_upload_bytes: 1024 * 1024,
    };
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    addr
}

fn session() -> CaptureSession {
    CaptureSession::new()
        .set_image(Some(UploadedImage {
            file_name: "me.png".into(),
            mime: ImageMime::Png,
            data: png(8, 8, [10, 20, 30, 255]),
        }))
        .set_role(Role::Photographer)
}

#[actix_web::test]
async fn generated_image_is_watermarked() {
    let generated = png(200, 100, [0, 0, 255, 255]);
    let addr = spawn_proxy(Arc::new(FixedImage(
        general_purpose::STANDARD.encode(&generated),
    )));
    let submitter =
        Submitter::new(&ClientConfig::default().with_api_base(format!("http://{}", addr)));
    let logo = png(16, 16, [255, 255, 255, 255]);

    let done = client::generate(session(), &submitter, Some(logo.as_slice())).await;

    assert_eq!(done.error(), None);
    assert!(!done.in_flight());
    let result = done.result().unwrap();
    assert_eq!(result.download_name(), "image-photographer.png");
    assert_ne!(result.png, generated);
    let decoded = image::load_from_memory(&result.png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (200, 100));
}

#[actix_web::test]
async fn broken_logo_still_shows_result() {
    let generated = png(50, 50, [0, 255, 0, 255]);
    let addr = spawn_proxy(Arc::new(FixedImage(
        general_purpose::STANDARD.encode(&generated),
    )));
    let submitter =
        Submitter::new(&ClientConfig::default().with_api_base(format!("http://{}/", addr)));

    let done = client::generate(session(), &submitter, Some(&b"not a png"[..])).await;

    assert_eq!(done.result().unwrap().png, generated);
}

#[actix_web::test]
async fn provider_refusal_surfaces_as_error_line() {
    let addr = spawn_proxy(Arc::new(NoImage));
    let submitter =
        Submitter::new(&ClientConfig::default().with_api_base(format!("http://{}", addr)));

    let err = submitter
        .submit(session().image(), Some(Role::Blogger))
        .await
        .unwrap_err();
    match err {
        SubmitError::ProxyError(body) => {
            let body: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(body["error"], "NO_IMAGE");
            assert_eq!(body["details"], "Cannot edit this photo");
        }
        other => panic!("expected ProxyError, got {:?}", other),
    }

    let done = client::generate(session(), &submitter, None).await;
    assert!(done.result().is_none());
    assert!(done.error().unwrap().contains("NO_IMAGE"));
}

#[actix_web::test]
async fn static_host_rejecting_post_is_hosting_misconfigured() {
    let server = HttpServer::new(|| {
        App::new().route(
            "/api/generate",
            web::post().to(|| async {
                HttpResponse::MethodNotAllowed()
                    .content_type("application/xml")
                    .body("<Error><Code>UnsupportedHttpVerb</Code></Error>")
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    let submitter =
        Submitter::new(&ClientConfig::default().with_api_base(format!("http://{}", addr)));
    let err = submitter
        .submit(session().image(), session().role())
        .await
        .unwrap_err();
    assert_eq!(err, SubmitError::HostingMisconfigured);
}
