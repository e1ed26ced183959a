use actix_web::{web, App, HttpServer, middleware};
use actix_cors::Cors;
use relevance::api::assets::static_file_handler;
use relevance::api::{configure_routes, AppState};
use relevance::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Could not load .env file: {}", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = config::AppConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::other(e)
    })?;

    if app_config.gemini.api_key.is_empty() {
        log::warn!("GEMINI_API_KEY is not set; requests will be sent without a key");
    }
    log::info!(
        "Scoring with {} (max {} attempts, base delay {}ms)",
        app_config.gemini.model,
        app_config.retry.max_attempts,
        app_config.retry.base_delay_ms
    );

    let bind = (app_config.server.host.clone(), app_config.server.port);
    let state = AppState::new(app_config).map_err(std::io::Error::other)?;

    println!("🚀 Starting server...");
    println!("📊 Frontend available at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
            .route("/{_:.*}", web::get().to(static_file_handler))
    })
    .bind(bind)?
    .run()
    .await
}
