use actix_web::{web, HttpResponse};
use notes_types::ApiResponse;
use serde::Deserialize;

use crate::error::NotesError;
use crate::AppState;

async fn list_templates(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data.store.list_templates()))
}

#[derive(Debug, Deserialize)]
struct ApplyTemplateQuery {
    #[serde(default)]
    title: String,
    #[serde(default)]
    folder: String,
}

/// Render a template with the caller's title and folder filled in
async fn apply_template(
    data: web::Data<AppState>,
    name: web::Path<String>,
    query: web::Query<ApplyTemplateQuery>,
) -> Result<HttpResponse, NotesError> {
    let rendered = data.store.apply_template(&name, &query.title, &query.folder)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(rendered)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/templates")
            .route("", web::get().to(list_templates))
            .route("/{name}", web::get().to(apply_template)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support;
    use actix_web::{http::StatusCode, test, App};
    use tempfile::tempdir;

    #[actix_web::test]
    async fn test_apply_template() {
        let dir = tempdir().unwrap();
        let state = test_support::state(dir.path());
        state
            .store
            .save_note("_templates/meeting", "# {{title}} ({{folder}})")
            .unwrap();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get().uri("/api/templates").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["name"], "meeting");

        let req = test::TestRequest::get()
            .uri("/api/templates/meeting?title=Sync&folder=work")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["content"], "# Sync (work)");

        let req = test::TestRequest::get().uri("/api/templates/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
