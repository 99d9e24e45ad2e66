//! Vicinity API Server Entry Point
//!
//! Bootstraps configuration, wires the collaborator clients into the
//! request pipeline, and starts the Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use vicinity_api::telemetry::init_telemetry;
use vicinity_api::{create_api_router, ApiError, ApiResult, AppState, GatewayConfig};
use vicinity_cache::{MemoryBackend, TieredCache};
use vicinity_providers::{
    FoursquareDirectory, InsightEngine, PlaceDirectory, RemoteInsightEngine,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_telemetry();

    let config = GatewayConfig::from_env();
    if config.directory_api_key.is_empty() {
        tracing::warn!(
            "VICINITY_DIRECTORY_API_KEY is not set; directory calls will be rejected upstream"
        );
    }

    let directory: Arc<dyn PlaceDirectory> = Arc::new(FoursquareDirectory::new(
        config.directory_api_key.clone(),
        config.directory_base_url.clone(),
    ));
    let engine: Arc<dyn InsightEngine> =
        Arc::new(RemoteInsightEngine::new(config.insight_engine_url.clone()));
    let cache = TieredCache::new(Arc::new(MemoryBackend::new()));

    let state = AppState::new(directory, engine, cache, config.clone());
    let app = create_api_router(state);

    let addr = resolve_bind_addr(&config)?;
    tracing::info!(%addr, "Starting Vicinity API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr(config: &GatewayConfig) -> ApiResult<SocketAddr> {
    let addr = format!("{}:{}", config.bind_host, config.bind_port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::internal_error(format!("Invalid bind address {}: {}", addr, e)))
}
