use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use crate::config::ServerConfig;
use crate::handlers;
use crate::state::AppState;

/// Registers every route; shared by `run_server` and the integration tests.
pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/token/", web::post().to(handlers::token::handler))
        .route(
            "/generate-summary/",
            web::post().to(handlers::summary::handler),
        )
        .route(
            "/generate-bullet-points/",
            web::post().to(handlers::bullet_points::handler),
        )
        .route("/health", web::get().to(handlers::health::handler))
        .route("/openapi.json", web::get().to(handlers::openapi::handler));
}

pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = web::Data::new(AppState::from_config(&config).await?);
    let bind_address = config.bind_address();

    log::info!("Starting summarizer server on {}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .wrap(Cors::permissive())
            .configure(app_config)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server.bind(&bind_address)?.run().await?;

    log::info!("Server stopped");
    Ok(())
}
