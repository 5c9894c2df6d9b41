use actix_web::{web, HttpResponse};
use notes_types::ApiResponse;

use crate::AppState;

/// Every tag with its note count
async fn list_tags(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data.store.list_tags()))
}

async fn notes_by_tag(data: web::Data<AppState>, tag: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data.store.notes_by_tag(&tag)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tags")
            .route("", web::get().to(list_tags))
            .route("/{tag}", web::get().to(notes_by_tag)),
    );
}
