//! Place REST API Routes
//!
//! Axum route handlers for place search and single-place lookups. Handlers
//! stay thin: parse and validate parameters, delegate to the service,
//! serialize the result.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json,
};

use vicinity_core::{EnrichedPlace, PlaceDetails};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{PlaceSearchResponse, SearchParams};
use crate::validation::build_query;

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/places/search - Search and enrich places near a point
#[utoipa::path(
    get,
    path = "/api/v1/places/search",
    tag = "Places",
    params(SearchParams),
    responses(
        (status = 200, description = "Enriched search results", body = PlaceSearchResponse),
        (status = 400, description = "Invalid parameters", body = ApiError),
        (status = 429, description = "Rate limit exceeded", body = ApiError),
        (status = 500, description = "Directory unavailable", body = ApiError),
    )
)]
pub async fn search_places(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PlaceSearchResponse>> {
    let query = build_query(params)?;
    let response = state.service.search(query).await?;
    Ok(Json(response))
}

/// GET /api/v1/places/intelligence - Alias of search focused on insights
#[utoipa::path(
    get,
    path = "/api/v1/places/intelligence",
    tag = "Places",
    params(SearchParams),
    responses(
        (status = 200, description = "Enriched search results", body = PlaceSearchResponse),
        (status = 400, description = "Invalid parameters", body = ApiError),
    )
)]
pub async fn place_intelligence(
    state: State<AppState>,
    params: Query<SearchParams>,
) -> ApiResult<Json<PlaceSearchResponse>> {
    search_places(state, params).await
}

/// GET /api/v1/places/{place_id}/details - Extended directory record
#[utoipa::path(
    get,
    path = "/api/v1/places/{place_id}/details",
    tag = "Places",
    params(("place_id" = String, Path, description = "Directory place identifier")),
    responses(
        (status = 200, description = "Place details", body = PlaceDetails),
        (status = 404, description = "Place not found", body = ApiError),
        (status = 500, description = "Directory unavailable", body = ApiError),
    )
)]
pub async fn place_details(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> ApiResult<Json<PlaceDetails>> {
    let details = state.service.details(&place_id).await?;
    Ok(Json(details))
}

/// GET /api/v1/places/{place_id}/insights - Enriched record for one place
#[utoipa::path(
    get,
    path = "/api/v1/places/{place_id}/insights",
    tag = "Places",
    params(("place_id" = String, Path, description = "Directory place identifier")),
    responses(
        (status = 200, description = "Enriched place record", body = EnrichedPlace),
        (status = 404, description = "Place not found", body = ApiError),
        (status = 500, description = "Directory unavailable", body = ApiError),
    )
)]
pub async fn place_insights(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> ApiResult<Json<EnrichedPlace>> {
    let enriched = state.service.insights(&place_id).await?;
    Ok(Json(enriched))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the place routes router.
pub fn create_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/search", get(search_places))
        .route("/intelligence", get(place_intelligence))
        .route("/:place_id/details", get(place_details))
        .route("/:place_id/insights", get(place_insights))
}
