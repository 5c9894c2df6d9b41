use actix_web::{web, HttpResponse};
use notes_types::ApiResponse;

use crate::themes;
use crate::AppState;

async fn list_themes(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(themes::available_themes(&data.config.themes_dir)))
}

/// Raw CSS for one theme
async fn get_theme(data: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    match themes::theme_css(&data.config.themes_dir, &id) {
        Some(css) => HttpResponse::Ok().content_type("text/css; charset=utf-8").body(css),
        None => HttpResponse::NotFound()
            .json(ApiResponse::<()>::err(format!("Theme not found: {}", id.as_str()))),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/themes")
            .route("", web::get().to(list_themes))
            .route("/{id}", web::get().to(get_theme)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support;
    use actix_web::{http::StatusCode, test, App};
    use tempfile::tempdir;

    #[actix_web::test]
    async fn test_list_and_fetch_theme() {
        let dir = tempdir().unwrap();
        let state = test_support::state(dir.path());
        std::fs::create_dir_all(&state.config.themes_dir).unwrap();
        std::fs::write(state.config.themes_dir.join("light.css"), "/* @theme-type: light */").unwrap();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get().uri("/api/themes").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["id"], "light");
        assert_eq!(body["data"][0]["type"], "light");

        let req = test::TestRequest::get().uri("/api/themes/light").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let css = test::read_body(resp).await;
        assert_eq!(css, web::Bytes::from_static(b"/* @theme-type: light */"));

        let req = test::TestRequest::get().uri("/api/themes/nope").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
