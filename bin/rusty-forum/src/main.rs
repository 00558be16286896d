//! # rusty-forum Binary
//!
//! The entry point that assembles the application based on compile-time
//! features.

use actix_files::Files;
use actix_web::{web, App, HttpServer};
use rf_api::handlers::AppState;
use rf_api::session::SessionStore;

#[cfg(feature = "db-sqlite")]
use rf_db_sqlite::SqliteForumRepo;

#[cfg(feature = "storage-local")]
use rf_storage_local::LocalMediaStore;

#[cfg(feature = "auth-simple")]
use rf_auth_simple::SimpleAuthProvider;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:rusty_forum.db".to_string());
    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let upload_dir =
        std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./data/uploads".to_string());

    #[cfg(feature = "db-sqlite")]
    let repo = SqliteForumRepo::new(&database_url).await.expect("Failed to init SQLite");

    #[cfg(feature = "storage-local")]
    let store = LocalMediaStore::new(upload_dir.clone().into(), "/static/uploads".to_string());

    #[cfg(feature = "auth-simple")]
    let auth = SimpleAuthProvider::new();

    let state = web::Data::new(AppState {
        repo: Box::new(repo),
        store: Box::new(store),
        auth: Box::new(auth),
        sessions: SessionStore::new(),
    });

    log::info!("rusty-forum starting on http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(rf_api::middleware::standard_middleware())
            .service(Files::new("/static/uploads", upload_dir.clone()))
            .configure(rf_api::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
