// src/bin/api_server.rs

use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use training_portal::transport;
use training_portal::{compile, AppConfig, SqliteStore};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let config = AppConfig::from_env()?;

    // --- Form Registry (immutable for the life of the process) ---
    let registry = Arc::new(config.load_registry()?);

    // --- Store + schema: a missing table for a declared form is fatal ---
    tracing::info!(database_url = %config.database_url, "connecting to database");
    let store = Arc::new(SqliteStore::connect(&config.database_url, config.max_connections).await?);
    compile(&registry, store.as_ref()).await?;

    let app_state = transport::http::AppState::new(registry, store);

    // --- API Server ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "API server listening (Swagger UI at /swagger-ui)");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
            }
        })
        .await?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}
