//! Analytics REST API Routes
//!
//! Area-level aggregates: popular places around a point and the trend
//! summary.

use axum::{
    extract::{Query, State},
    routing::get,
    Json,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{PopularParams, PopularPlacesResponse, TrendsResponse};
use crate::validation::require_coordinates;

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/analytics/popular - Popular places around a point
#[utoipa::path(
    get,
    path = "/api/v1/analytics/popular",
    tag = "Analytics",
    params(PopularParams),
    responses(
        (status = 200, description = "Popular places in the area", body = PopularPlacesResponse),
        (status = 400, description = "Invalid parameters", body = ApiError),
        (status = 500, description = "Directory unavailable", body = ApiError),
    )
)]
pub async fn popular_places(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> ApiResult<Json<PopularPlacesResponse>> {
    let (lat, lng) = require_coordinates(params.lat, params.lng)?;
    let response = state.service.popular(lat, lng).await?;
    Ok(Json(response))
}

/// GET /api/v1/analytics/trends - Area trend summary
#[utoipa::path(
    get,
    path = "/api/v1/analytics/trends",
    tag = "Analytics",
    responses(
        (status = 200, description = "Trend summary", body = TrendsResponse),
    )
)]
pub async fn trends(State(state): State<AppState>) -> Json<TrendsResponse> {
    Json(state.service.trends().await)
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the analytics routes router.
pub fn create_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/popular", get(popular_places))
        .route("/trends", get(trends))
}
