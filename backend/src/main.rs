use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tokio::signal;

mod config;
mod db;
mod api_error;
mod telemetry;
mod middleware;
mod models;
mod store;
mod http;
mod service;

use crate::config::Config;
use crate::db::create_pool;
use crate::http::AppState;
use crate::middleware::cors_middleware;
use crate::store::{BolaoStore, InMemoryStore, PgStore, Seed};
use crate::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize telemetry
    init_telemetry(&config.log_filter());

    let store: Arc<dyn BolaoStore> = match &config.database {
        Some(database) => {
            let db_pool = create_pool(database).await?;
            let store = PgStore::new(db_pool);
            store.migrate().await?;
            tracing::info!(max_connections = database.max_connections, "Using PostgreSQL store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(InMemoryStore::new())
        }
    };

    if let Some(path) = &config.seed_file {
        tracing::info!(path = %path, "Loading seed data");
        Seed::from_file(path)?.apply(store.as_ref()).await?;
    }

    let state = web::Data::new(AppState::new(store, config.ranking.chart_limit));

    tracing::info!(
        "Starting bolao backend server on {}:{}",
        config.server.host,
        config.server.port
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors_middleware())
            .wrap(actix_web::middleware::Logger::default())
            .configure(crate::http::configure)
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run();

    // Graceful shutdown
    let server_handle = server.handle();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received, stopping server...");
        server_handle.stop(true).await;
    });

    server.await?;
    Ok(())
}
