//! Vicinity API - REST API Layer
//!
//! The HTTP surface of the Vicinity location-intelligence gateway. Exposes
//! place search, single-place lookups, area analytics, cache operations,
//! and health probes over Axum, with per-client rate limiting on the whole
//! surface.
//!
//! The pipeline behind every read path: rate limiter admits -> cache
//! check -> on miss, directory fetch (fatal on failure) -> bounded-fan-out
//! enrichment (degrades per item) -> best-effort write-through -> response
//! with provenance metadata.

pub mod config;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::GatewayConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use middleware::{rate_limit_middleware, spawn_eviction_task, RateLimitState};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::PlaceService;
pub use state::AppState;
pub use types::*;
