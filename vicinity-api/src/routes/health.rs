//! Health Check Endpoints
//!
//! Kubernetes-compatible health check endpoints:
//! - /api/v1/health - Overall status with per-collaborator detail
//! - /api/v1/health/ping - Simple liveness check
//! - /api/v1/health/live - Process alive check
//! - /api/v1/health/ready - Cache-probe readiness check
//!
//! A degraded cache never fails readiness: the gateway stays fully
//! functional without it, only slower.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Status of one collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: HealthStatus::Healthy,
                error: None,
            },
            Err(err) => Self {
                status: HealthStatus::Unhealthy,
                error: Some(err.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Per-collaborator statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServiceStatuses {
    pub directory: ComponentHealth,
    pub insight_engine: ComponentHealth,
    pub cache: ComponentHealth,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<ServiceStatuses>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /api/v1/health - Overall status with per-collaborator detail
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Gateway status", body = HealthResponse),
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (directory, engine, cache) = tokio::join!(
        state.directory.health_check(),
        state.engine.health_check(),
        state.cache.health_check(),
    );

    let services = ServiceStatuses {
        directory: ComponentHealth::from_result(directory),
        insight_engine: ComponentHealth::from_result(engine),
        cache: ComponentHealth::from_result(cache),
    };

    let all_healthy = services.directory.is_healthy()
        && services.insight_engine.is_healthy()
        && services.cache.is_healthy();

    Json(HealthResponse {
        status: if all_healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        },
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        services: Some(services),
    })
}

/// GET /api/v1/health/ping - Simple pong response
#[utoipa::path(
    get,
    path = "/api/v1/health/ping",
    tag = "Health",
    responses(
        (status = 200, description = "Service is responding", body = String),
    )
)]
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /api/v1/health/live - Process liveness check
#[utoipa::path(
    get,
    path = "/api/v1/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    )
)]
pub async fn liveness(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        services: None,
    })
}

/// GET /api/v1/health/ready - Readiness check (cache probe)
#[utoipa::path(
    get,
    path = "/api/v1/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready (possibly degraded)", body = HealthResponse),
    )
)]
pub async fn readiness(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache_status = match state.cache.health_check().await {
        Ok(()) => HealthStatus::Healthy,
        Err(err) => {
            tracing::warn!(error = %err, "Cache probe failed; serving degraded");
            HealthStatus::Degraded
        }
    };

    Json(HealthResponse {
        status: cache_status,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        services: None,
    })
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the health routes router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/ping", get(ping))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}
