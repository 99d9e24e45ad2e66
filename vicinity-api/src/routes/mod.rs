//! REST API Routes Module
//!
//! Route handlers organized by surface area, plus the top-level router
//! composition: CORS, request tracing, and rate limiting are layered here
//! so every endpoint - operational ones included - sits behind them.
//!
//! # Middleware Order (outer to inner)
//! 1. Trace (outermost) - request/response logging
//! 2. CORS - handles preflight requests
//! 3. Rate limiting - rejects floods before any handler work
//! 4. Handlers

pub mod analytics;
pub mod cache;
pub mod health;
pub mod places;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::config::GatewayConfig;
use crate::middleware::{rate_limit_middleware, spawn_eviction_task, RateLimitState};
use crate::openapi::ApiDoc;
use crate::state::AppState;

// Re-export route creation functions for convenience
pub use analytics::create_router as analytics_router;
pub use cache::create_router as cache_router;
pub use health::create_router as health_router;
pub use places::create_router as places_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ============================================================================
// CORS
// ============================================================================

/// Build the CORS layer from configured origins; an empty list means
/// dev mode, allow all.
fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

/// Build the complete router with the full middleware stack.
///
/// Spawns the rate-limiter eviction task; call from within a tokio
/// runtime.
pub fn create_api_router(state: AppState) -> Router {
    let rate_limit_state = RateLimitState::new(&state.config);
    let _eviction = spawn_eviction_task(&rate_limit_state);

    let api_routes = Router::new()
        .nest("/places", places::create_router())
        .nest("/analytics", analytics::create_router())
        .nest("/cache", cache::create_router())
        .nest("/health", health::create_router());

    let config = Arc::clone(&state.config);
    let router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/openapi.json", get(openapi_json))
        .with_state(state);

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(from_fn_with_state(rate_limit_state, rate_limit_middleware))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
}
