//! Notes REST API: listing, reading, writing, moving and searching notes.

use actix_web::{web, HttpResponse};
use notes_types::{ApiResponse, MoveRequest, SaveNoteRequest};
use serde::Deserialize;

use crate::error::NotesError;
use crate::AppState;

/// All notes and images, newest first
async fn list_notes(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data.store.list_notes()))
}

async fn get_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, NotesError> {
    let note = data.store.get_note(&path)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(note)))
}

async fn save_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SaveNoteRequest>,
) -> Result<HttpResponse, NotesError> {
    let saved = data.store.save_note(&path, &body.content)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "path": saved }))))
}

async fn delete_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, NotesError> {
    data.store.delete_note(&path)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "path": path.into_inner() }))))
}

async fn move_note(
    data: web::Data<AppState>,
    body: web::Json<MoveRequest>,
) -> Result<HttpResponse, NotesError> {
    data.store.move_note(&body.old_path, &body.new_path)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "path": body.new_path }))))
}

async fn note_metadata(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, NotesError> {
    let metadata = data.store.note_metadata(&path)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(metadata)))
}

// --- Search ---

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn search_notes(data: web::Data<AppState>, query: web::Query<SearchQuery>) -> HttpResponse {
    let results = data.store.search(&query.q);
    log::debug!("[SEARCH] {:?} -> {} notes", query.q, results.len());
    HttpResponse::Ok().json(ApiResponse::ok(results))
}

/// `POST /move` and `GET /metadata/...` shadow a root note named `move` and a
/// folder named `metadata`. Clients address notes with their `.md` suffix
/// (`/api/notes/move.md`), which never collides.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/search").route(web::get().to(search_notes)));
    cfg.service(
        web::scope("/api/notes")
            .route("", web::get().to(list_notes))
            .route("/move", web::post().to(move_note))
            .route("/metadata/{path:.*}", web::get().to(note_metadata))
            .route("/{path:.*}", web::get().to(get_note))
            .route("/{path:.*}", web::post().to(save_note))
            .route("/{path:.*}", web::delete().to(delete_note)),
    );
}
