use actix_web::{web, HttpResponse, Responder};
use notes_types::ApiResponse;

use crate::AppState;

/// Drop every cached tag list; the next listing re-reads all notes
async fn clear_cache(state: web::Data<AppState>) -> impl Responder {
    let cache = state.store.tag_cache();
    let cleared = cache.len();
    cache.clear();
    log::info!("[TAGS] Cache cleared ({} entries)", cleared);

    HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "cleared": cleared })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/cache/clear").route(web::post().to(clear_cache)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support;
    use actix_web::{test, App};
    use tempfile::tempdir;

    #[actix_web::test]
    async fn test_clear_cache() {
        let dir = tempdir().unwrap();
        let state = test_support::state(dir.path());
        state.store.save_note("a", "---\ntags: [x]\n---\n").unwrap();
        state.store.list_notes();
        assert_eq!(state.store.tag_cache().len(), 1);

        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;
        let req = test::TestRequest::post().uri("/api/cache/clear").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["cleared"], 1);
        assert!(state.store.tag_cache().is_empty());
    }
}
