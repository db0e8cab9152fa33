// src/handlers.rs
use crate::{AppState, cors::with_cors, errors::RolecastError, models::*};
use actix_multipart::{Field, Multipart};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::Method, web};
use bytes::BytesMut;
use futures_util::TryStreamExt;

pub const GENERATE_PATH: &str = "/api/generate";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(GENERATE_PATH)
            .route(web::post().to(generate))
            .default_service(web::to(fallback)),
    )
    .service(
        web::resource("/")
            .route(web::method(Method::OPTIONS).to(preflight))
            .default_service(web::to(health_check)),
    )
    .default_service(web::to(fallback));
}

struct Upload {
    image: Option<(Vec<u8>, Option<String>)>,
    role: Option<String>,
}

pub async fn generate(
    req: HttpRequest,
    payload: Multipart,
    data: web::Data<AppState>,
) -> HttpResponse {
    let response = match generate_portrait(payload, &data).await {
        Ok(image_base64) => HttpResponse::Ok().json(GenerateResponse { image_base64 }),
        Err(e) => {
            match &e {
                RolecastError::NoFile | RolecastError::FileTooLarge { .. } => {
                    log::info!("Rejected upload: {}", e)
                }
                RolecastError::NoImage { details } => {
                    log::warn!("Provider returned no image: {}", details)
                }
                other => log::error!("Generation failed: {}", other),
            }
            e.error_response()
        }
    };
    with_cors(&req, response)
}

async fn generate_portrait(
    payload: Multipart,
    data: &AppState,
) -> Result<String, RolecastError> {
    let upload = read_upload(payload, data.max_upload_bytes).await?;
    let (bytes, content_type) = upload.image.ok_or(RolecastError::NoFile)?;
    let role = Role::from_form(upload.role.as_deref());

    let request = data
        .image_processor
        .build_request(&bytes, content_type.as_deref(), role);

    log::info!(
        "Generating {} portrait from {} upload ({} bytes)",
        role,
        request.mime_type,
        bytes.len()
    );

    data.generator.generate(&request).await
}

async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Upload, RolecastError> {
    let mut upload = Upload {
        image: None,
        role: None,
    };

    while let Some(mut field) = payload.try_next().await? {
        let content_disposition = field.content_disposition();
        let name = content_disposition.get_name().unwrap_or_default().to_string();
        // A plain text value under `image` is not a file.
        let is_file = content_disposition.get_filename().is_some();
        let content_type = field.content_type().map(|ct| ct.to_string());

        let body = read_field(&mut field, limit).await?;

        match name.as_str() {
            "image" if is_file && upload.image.is_none() => {
                upload.image = Some((body.to_vec(), content_type));
            }
            "role" if upload.role.is_none() => {
                upload.role = Some(String::from_utf8_lossy(&body).into_owned());
            }
            _ => {}
        }
    }

    Ok(upload)
}

async fn read_field(field: &mut Field, limit: usize) -> Result<BytesMut, RolecastError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.try_next().await? {
        if buf.len() + chunk.len() > limit {
            return Err(RolecastError::FileTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

pub async fn preflight(req: HttpRequest) -> HttpResponse {
    with_cors(&req, HttpResponse::NoContent().finish())
}

pub async fn health_check(req: HttpRequest) -> HttpResponse {
    with_cors(&req, HttpResponse::Ok().content_type("text/plain").body("OK"))
}

/// OPTIONS on any path is a preflight; everything else unrouted is 404.
pub async fn fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return preflight(req).await;
    }
    with_cors(
        &req,
        HttpResponse::NotFound()
            .content_type("text/plain")
            .body("Not Found"),
    )
}
