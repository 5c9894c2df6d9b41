//! Image attachments: listing, streaming and multipart upload.

use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use notes_types::ApiResponse;

use crate::error::NotesError;
use crate::AppState;

async fn list_images(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data.store.list_images()))
}

async fn get_image(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<NamedFile, NotesError> {
    let full = data.store.image_path(&path)?;
    Ok(NamedFile::open(full)?)
}

/// Accepts a multipart form with a `file` part and an optional `folder` part.
async fn upload_image(
    data: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let limit = data.config.max_upload_bytes;
    let mut folder = String::new();
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field.name().to_string();
        let filename = field
            .content_disposition()
            .get_filename()
            .map(|f| f.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > limit {
                log::warn!("[NOTES] Rejected upload over {} bytes", limit);
                return Ok(HttpResponse::PayloadTooLarge().json(ApiResponse::<()>::err(format!(
                    "File exceeds the {} byte upload limit",
                    limit
                ))));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "folder" => folder = String::from_utf8_lossy(&bytes).trim().to_string(),
            "file" => upload = Some((filename.unwrap_or_default(), bytes)),
            _ => {}
        }
    }

    let Some((filename, bytes)) = upload else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::err("No file provided")));
    };

    let record = data.store.save_image(&folder, &filename, &bytes)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(record)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/images")
            .route("", web::get().to(list_images))
            .route("", web::post().to(upload_image))
            .route("/{path:.*}", web::get().to(get_image)),
    );
}
