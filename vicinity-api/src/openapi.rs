//! OpenAPI Specification for the Vicinity API
//!
//! Uses utoipa to generate the OpenAPI document from Rust types and route
//! annotations.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{analytics, cache, health, places};
use crate::types::{
    CacheStatsResponse, InvalidateRequest, InvalidateResponse, PlaceSearchResponse,
    PopularPlacesResponse, SearchMeta, TrendSummary, TrendsResponse,
};

// Import domain types from vicinity-core
use vicinity_core::{
    AccessibilityFeatures, AccessibilityInsights, BusinessInsights, CategoryIcon, EnrichedPlace,
    InclusiveRecommendations, LiveContext, OpeningHours, OpeningSlot, Place, PlaceCategory,
    PlaceDetails, PlaceLocation, PlaceStats, RecommendationSummary,
};

/// OpenAPI document for the Vicinity API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vicinity API",
        description = "Location-intelligence gateway: place search, per-place enrichment, area analytics",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local Development")
    ),
    tags(
        (name = "Places", description = "Place search and single-place lookups"),
        (name = "Analytics", description = "Area-level aggregates: popular places and trends"),
        (name = "Cache", description = "Cache statistics and invalidation"),
        (name = "Health", description = "Liveness and readiness probes"),
    ),
    paths(
        places::search_places,
        places::place_intelligence,
        places::place_details,
        places::place_insights,
        analytics::popular_places,
        analytics::trends,
        cache::cache_stats,
        cache::invalidate_cache,
        health::health,
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        PlaceSearchResponse,
        SearchMeta,
        PopularPlacesResponse,
        TrendsResponse,
        TrendSummary,
        CacheStatsResponse,
        InvalidateRequest,
        InvalidateResponse,
        health::HealthResponse,
        health::HealthStatus,
        health::ComponentHealth,
        health::ServiceStatuses,
        EnrichedPlace,
        BusinessInsights,
        LiveContext,
        AccessibilityInsights,
        AccessibilityFeatures,
        InclusiveRecommendations,
        RecommendationSummary,
        Place,
        PlaceLocation,
        PlaceCategory,
        CategoryIcon,
        PlaceDetails,
        OpeningHours,
        OpeningSlot,
        PlaceStats,
    ))
)]
pub struct ApiDoc;
