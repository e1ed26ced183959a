// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .route("/state", web::get().to(handlers::get_state))
            .route("/input", web::put().to(handlers::update_input))
            .route("/evaluate", web::post().to(handlers::run_evaluation))
            .route("/score", web::post().to(handlers::score))
            .route("/ws", web::get().to(handlers::ws_handler))
    );
}
