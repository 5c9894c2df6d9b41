use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::{Duration, Instant};

mod config;
mod controllers;
mod error;
mod notes;
mod themes;
mod vfs;

use config::Config;
use notes::{NoteStore, TagCache};
use vfs::{FileSystem, PhysicalFileSystem};

pub struct AppState {
    pub store: Arc<NoteStore>,
    pub config: Config,
    pub started_at: Instant,
}

/// Unknown routes under the static dir get the web UI's index page
async fn spa_fallback(state: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open(state.config.static_dir.join("index.html"))?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    config::ensure_directories(&config)?;

    log::info!("Initializing tag cache");
    let fs: Arc<dyn FileSystem> = Arc::new(PhysicalFileSystem);
    let tags = Arc::new(TagCache::new(fs.clone()));
    let store = Arc::new(NoteStore::new(&config.notes_dir, fs, tags.clone())?);

    let serve_frontend = config.static_dir.join("index.html").is_file();
    if serve_frontend {
        log::info!("Serving frontend from: {}", config.static_dir.display());
    } else {
        log::info!("No frontend at {}, serving API only", config.static_dir.display());
    }

    let bind_addr = config.bind_addr();
    log::info!("Starting notes server on {}", bind_addr);

    let state = web::Data::new(AppState {
        store,
        config: config.clone(),
        started_at: Instant::now(),
    });
    let json_limit = config.max_upload_bytes;
    let static_dir = config.static_dir.clone();

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(json_limit))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
            .configure(controllers::folders::config)
            .configure(controllers::tags::config)
            .configure(controllers::images::config)
            .configure(controllers::templates::config)
            .configure(controllers::themes::config)
            .configure(controllers::cache::config);

        if serve_frontend {
            app = app.service(
                Files::new("/", static_dir.clone())
                    .index_file("index.html")
                    .default_handler(web::to(spa_fallback)),
            );
        }

        app
    })
    .bind(bind_addr)?
    .run();

    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        log::info!("[TAGS] Dropping {} cached entries", tags.len());
        tags.clear();

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
