//! Cache Operations REST API Routes
//!
//! Operational endpoints over the cache store: per-class key counts and
//! prefix invalidation.

use axum::{
    extract::State,
    routing::{get, post},
    Json,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{CacheStatsResponse, InvalidateRequest, InvalidateResponse};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/cache/stats - Per-class cache key counts
#[utoipa::path(
    get,
    path = "/api/v1/cache/stats",
    tag = "Cache",
    responses(
        (status = 200, description = "Cache statistics", body = CacheStatsResponse),
    )
)]
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse::from(state.cache.stats().await))
}

/// POST /api/v1/cache/invalidate - Remove all keys under a prefix
#[utoipa::path(
    post,
    path = "/api/v1/cache/invalidate",
    tag = "Cache",
    request_body = InvalidateRequest,
    responses(
        (status = 200, description = "Invalidation result", body = InvalidateResponse),
        (status = 400, description = "Invalid pattern", body = ApiError),
    )
)]
pub async fn invalidate_cache(
    State(state): State<AppState>,
    Json(request): Json<InvalidateRequest>,
) -> ApiResult<Json<InvalidateResponse>> {
    let pattern = request.pattern.trim().trim_end_matches('*').to_string();
    if pattern.is_empty() {
        return Err(ApiError::missing_field("pattern"));
    }

    let deleted = state.cache.invalidate(&pattern).await;
    Ok(Json(InvalidateResponse { pattern, deleted }))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the cache routes router.
pub fn create_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/stats", get(cache_stats))
        .route("/invalidate", post(invalidate_cache))
}
