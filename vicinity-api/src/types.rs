//! Request and response DTOs for the REST surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vicinity_cache::CacheStats;
use vicinity_core::EnrichedPlace;

// ============================================================================
// SEARCH
// ============================================================================

/// Query parameters for place search.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct SearchParams {
    /// Free-text query.
    pub query: Option<String>,
    /// Latitude of the search center. Required.
    pub lat: Option<f64>,
    /// Longitude of the search center. Required.
    pub lng: Option<f64>,
    /// Search radius in meters (default 1000).
    pub radius: Option<u32>,
    /// Comma-separated directory category ids.
    pub categories: Option<String>,
    /// Maximum number of results (default 20).
    pub limit: Option<u32>,
}

/// Response metadata attached to search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchMeta {
    pub total: usize,
    /// Full pipeline latency on a miss, near-zero extra latency on a hit.
    pub processing_time_ms: u64,
    /// Data sources that contributed to this response.
    pub data_sources: Vec<String>,
}

/// Place search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlaceSearchResponse {
    pub results: Vec<EnrichedPlace>,
    pub meta: SearchMeta,
}

// ============================================================================
// ANALYTICS
// ============================================================================

/// Query parameters for popular places.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct PopularParams {
    /// Latitude of the area center. Required.
    pub lat: Option<f64>,
    /// Longitude of the area center. Required.
    pub lng: Option<f64>,
}

/// Popular places response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PopularPlacesResponse {
    pub popular_places: Vec<EnrichedPlace>,
    /// Area bucket the aggregate was computed for.
    pub location: String,
    pub total: usize,
    pub cached: bool,
}

/// Static trend summary for an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TrendSummary {
    pub trending_categories: Vec<String>,
    pub peak_hours: Vec<String>,
    pub popular_areas: Vec<String>,
}

/// Trends response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TrendsResponse {
    pub trends: TrendSummary,
    pub generated_at: DateTime<Utc>,
    pub cached: bool,
}

// ============================================================================
// CACHE OPERATIONS
// ============================================================================

/// Per-class cache key counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CacheStatsResponse {
    pub search_keys: u64,
    pub intel_keys: u64,
    pub details_keys: u64,
    pub popular_keys: u64,
    pub trends_keys: u64,
    pub total_keys: u64,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            search_keys: stats.search_keys,
            intel_keys: stats.intel_keys,
            details_keys: stats.details_keys,
            popular_keys: stats.popular_keys,
            trends_keys: stats.trends_keys,
            total_keys: stats.total_keys,
        }
    }
}

/// Request body for cache invalidation.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InvalidateRequest {
    /// Key prefix to remove, e.g. "search:". A trailing '*' is accepted
    /// and ignored.
    pub pattern: String,
}

/// Cache invalidation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InvalidateResponse {
    pub pattern: String,
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_deserialize_from_query_shape() -> Result<(), serde_json::Error> {
        let params: SearchParams = serde_json::from_str(
            r#"{"query": "coffee", "lat": 40.7, "lng": -74.0, "limit": 5}"#,
        )?;
        assert_eq!(params.query.as_deref(), Some("coffee"));
        assert_eq!(params.lat, Some(40.7));
        assert_eq!(params.radius, None);
        Ok(())
    }

    #[test]
    fn test_cache_stats_response_from_store_stats() {
        let stats = CacheStats {
            search_keys: 3,
            intel_keys: 1,
            total_keys: 4,
            ..Default::default()
        };
        let response = CacheStatsResponse::from(stats);
        assert_eq!(response.search_keys, 3);
        assert_eq!(response.total_keys, 4);
        assert_eq!(response.details_keys, 0);
    }
}
