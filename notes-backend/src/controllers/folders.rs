use actix_web::{web, HttpResponse};
use notes_types::{ApiResponse, CreateFolderRequest, MoveRequest};

use crate::error::NotesError;
use crate::AppState;

async fn list_folders(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data.store.list_folders()))
}

async fn create_folder(
    data: web::Data<AppState>,
    body: web::Json<CreateFolderRequest>,
) -> Result<HttpResponse, NotesError> {
    data.store.create_folder(&body.path)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "path": body.path }))))
}

async fn move_folder(
    data: web::Data<AppState>,
    body: web::Json<MoveRequest>,
) -> Result<HttpResponse, NotesError> {
    data.store.move_folder(&body.old_path, &body.new_path)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "path": body.new_path }))))
}

async fn rename_folder(
    data: web::Data<AppState>,
    body: web::Json<MoveRequest>,
) -> Result<HttpResponse, NotesError> {
    data.store.rename_folder(&body.old_path, &body.new_path)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "path": body.new_path }))))
}

async fn delete_folder(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, NotesError> {
    data.store.delete_folder(&path)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "path": path.into_inner() }))))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/folders")
            .route("", web::get().to(list_folders))
            .route("", web::post().to(create_folder))
            .route("/move", web::post().to(move_folder))
            .route("/rename", web::post().to(rename_folder))
            .route("/{path:.*}", web::delete().to(delete_folder)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;
    use tempfile::tempdir;

    #[actix_web::test]
    async fn test_folder_lifecycle() {
        let dir = tempdir().unwrap();
        let state = test_support::state(dir.path());
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/folders")
            .set_json(json!({ "path": "projects/alpha" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/folders/rename")
            .set_json(json!({ "old_path": "projects/alpha", "new_path": "projects/beta" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/folders").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!(["projects", "projects/beta"]));

        let req = test::TestRequest::delete().uri("/api/folders/projects").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert!(!state.store.root().join("projects").exists());
    }

    #[actix_web::test]
    async fn test_move_onto_existing_is_conflict() {
        let dir = tempdir().unwrap();
        let state = test_support::state(dir.path());
        state.store.create_folder("a").unwrap();
        state.store.create_folder("b").unwrap();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/folders/move")
            .set_json(json!({ "old_path": "a", "new_path": "b" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
    }
}
