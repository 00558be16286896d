//! # rf-api
//!
//! The web routing and orchestration layer for rusty-forum.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod session;

use actix_web::web;

/// Configures the routes for the forum.
///
/// `/thread/create` is registered before `/thread/{id}` so the literal
/// segment wins over the parameter.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/", web::get().to(handlers::top))
            .route("/thread/create", web::get().to(handlers::create_topic_form))
            .route("/thread/create", web::post().to(handlers::create_topic_post))
            .route("/thread/{id}", web::get().to(handlers::thread_detail))
            .route("/thread/{id}", web::post().to(handlers::post_comment))
            .route("/thread/{id}/comment/{no}/vote", web::post().to(handlers::vote))
            .route("/category/{url_code}", web::get().to(handlers::category_view))
            .route("/search", web::get().to(handlers::search))
            .route("/login", web::get().to(handlers::login_form))
            .route("/login", web::post().to(handlers::login))
            .route("/logout", web::post().to(handlers::logout)),
    );
}
