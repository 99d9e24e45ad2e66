//! Place read pipelines.
//!
//! Every operation follows the same cache-aside shape: derive key, read
//! cache, on miss fetch raw candidates from the directory (the one fatal
//! upstream), enrich through the fan-out, write back best-effort, assemble
//! response metadata. Concurrent misses on one key share a single upstream
//! fetch through the in-flight registry.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use vicinity_cache::{location_key, search_key, Singleflight, TieredCache, TtlClass};
use vicinity_core::{DirectoryError, EnrichedPlace, PlaceDetails, PlaceQuery};
use vicinity_providers::{Enricher, PlaceDirectory};

use crate::error::{ApiError, ApiResult};
use crate::types::{
    PlaceSearchResponse, PopularPlacesResponse, SearchMeta, TrendSummary, TrendsResponse,
};

/// Data sources reported when a response was assembled from cache.
const CACHED_DATA_SOURCES: [&str; 3] = ["cache", "foursquare", "intelligence"];

/// Data sources reported when a response ran the full pipeline.
const LIVE_DATA_SOURCES: [&str; 2] = ["foursquare", "intelligence"];

/// Wider radius used for area-level popular aggregates.
const POPULAR_RADIUS_M: u32 = 2000;

/// Candidate count for popular aggregates.
const POPULAR_LIMIT: u32 = 20;

/// Popularity score a place needs to count as popular.
const POPULARITY_THRESHOLD: f64 = 7.0;

/// Cache key for the global trend summary.
const TRENDS_KEY: &str = "global";

/// Keep places at or above the popularity threshold, preserving their
/// relative order.
fn filter_popular(enriched: Vec<EnrichedPlace>) -> Vec<EnrichedPlace> {
    enriched
        .into_iter()
        .filter(|place| place.business_intelligence.popularity_score >= POPULARITY_THRESHOLD)
        .collect()
}

fn sources(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|tag| tag.to_string()).collect()
}

/// Orchestrator for the place read paths.
#[derive(Clone)]
pub struct PlaceService {
    directory: Arc<dyn PlaceDirectory>,
    enricher: Enricher,
    cache: TieredCache,
    flights: Arc<Singleflight>,
}

impl PlaceService {
    pub fn new(directory: Arc<dyn PlaceDirectory>, enricher: Enricher, cache: TieredCache) -> Self {
        Self {
            directory,
            enricher,
            cache,
            flights: Arc::new(Singleflight::new()),
        }
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    /// Search for places and enrich each result.
    pub async fn search(&self, query: PlaceQuery) -> ApiResult<PlaceSearchResponse> {
        let started = Instant::now();
        query.validate()?;

        let key = search_key(&query);
        if let Some(results) = self
            .cache
            .get_json::<Vec<EnrichedPlace>>(TtlClass::Search, &key)
            .await
        {
            tracing::info!(cache_key = %key, "Returning cached search results");
            return Ok(Self::search_response(results, started, &CACHED_DATA_SOURCES));
        }

        // Hold the per-key slot across the expensive path so concurrent
        // misses on this query wait and then hit the fresh entry below.
        let _flight = self
            .flights
            .acquire(&TieredCache::namespaced(TtlClass::Search, &key))
            .await;
        if let Some(results) = self
            .cache
            .get_json::<Vec<EnrichedPlace>>(TtlClass::Search, &key)
            .await
        {
            return Ok(Self::search_response(results, started, &CACHED_DATA_SOURCES));
        }

        let places = self.directory.search(&query).await?;
        let enriched = self.enricher.enrich_batch(&places).await;
        self.cache.put_json(TtlClass::Search, &key, &enriched).await;

        tracing::info!(
            results = enriched.len(),
            processing_time_ms = started.elapsed().as_millis() as u64,
            lat = query.lat,
            lng = query.lng,
            "Place search completed"
        );
        Ok(Self::search_response(enriched, started, &LIVE_DATA_SOURCES))
    }

    fn search_response(
        results: Vec<EnrichedPlace>,
        started: Instant,
        data_sources: &[&str],
    ) -> PlaceSearchResponse {
        PlaceSearchResponse {
            meta: SearchMeta {
                total: results.len(),
                processing_time_ms: started.elapsed().as_millis() as u64,
                data_sources: sources(data_sources),
            },
            results,
        }
    }

    // ========================================================================
    // POPULAR PLACES
    // ========================================================================

    /// Popular places around a point: the search pipeline with a wider
    /// radius, then a popularity-threshold filter over the enriched
    /// results without re-sorting.
    pub async fn popular(&self, lat: f64, lng: f64) -> ApiResult<PopularPlacesResponse> {
        let query = PlaceQuery {
            radius: POPULAR_RADIUS_M,
            limit: POPULAR_LIMIT,
            ..PlaceQuery::new(lat, lng)
        };
        query.validate()?;

        let location = location_key(lat, lng);
        if let Some(popular) = self
            .cache
            .get_json::<Vec<EnrichedPlace>>(TtlClass::Popular, &location)
            .await
        {
            tracing::info!(location = %location, "Returning cached popular places");
            return Ok(Self::popular_response(popular, location, true));
        }

        let _flight = self
            .flights
            .acquire(&TieredCache::namespaced(TtlClass::Popular, &location))
            .await;
        if let Some(popular) = self
            .cache
            .get_json::<Vec<EnrichedPlace>>(TtlClass::Popular, &location)
            .await
        {
            return Ok(Self::popular_response(popular, location, true));
        }

        let places = self.directory.search(&query).await?;
        let enriched = self.enricher.enrich_batch(&places).await;
        let popular = filter_popular(enriched);
        self.cache
            .put_json(TtlClass::Popular, &location, &popular)
            .await;

        Ok(Self::popular_response(popular, location, false))
    }

    fn popular_response(
        popular: Vec<EnrichedPlace>,
        location: String,
        cached: bool,
    ) -> PopularPlacesResponse {
        PopularPlacesResponse {
            total: popular.len(),
            popular_places: popular,
            location,
            cached,
        }
    }

    // ========================================================================
    // SINGLE-PLACE LOOKUPS
    // ========================================================================

    /// Extended details for one place. The detail fetch is fatal on
    /// failure; there is nothing to degrade to.
    pub async fn details(&self, place_id: &str) -> ApiResult<PlaceDetails> {
        if place_id.trim().is_empty() {
            return Err(ApiError::missing_field("place_id"));
        }

        if let Some(details) = self
            .cache
            .get_json::<PlaceDetails>(TtlClass::Details, place_id)
            .await
        {
            tracing::info!(place_id = %place_id, "Returning cached place details");
            return Ok(details);
        }

        let _flight = self
            .flights
            .acquire(&TieredCache::namespaced(TtlClass::Details, place_id))
            .await;
        if let Some(details) = self
            .cache
            .get_json::<PlaceDetails>(TtlClass::Details, place_id)
            .await
        {
            return Ok(details);
        }

        let details = self
            .directory
            .detail(place_id)
            .await
            .map_err(|err| Self::map_detail_error(err, place_id))?;
        self.cache
            .put_json(TtlClass::Details, place_id, &details)
            .await;
        Ok(details)
    }

    /// Enriched insight record for one place: detail fetch (fatal), then
    /// single-item enrichment (non-fatal, degrades to the fallback).
    pub async fn insights(&self, place_id: &str) -> ApiResult<EnrichedPlace> {
        if place_id.trim().is_empty() {
            return Err(ApiError::missing_field("place_id"));
        }

        if let Some(enriched) = self
            .cache
            .get_json::<EnrichedPlace>(TtlClass::Intel, place_id)
            .await
        {
            tracing::info!(place_id = %place_id, "Returning cached place insights");
            return Ok(enriched);
        }

        let _flight = self
            .flights
            .acquire(&TieredCache::namespaced(TtlClass::Intel, place_id))
            .await;
        if let Some(enriched) = self
            .cache
            .get_json::<EnrichedPlace>(TtlClass::Intel, place_id)
            .await
        {
            return Ok(enriched);
        }

        let details = self
            .directory
            .detail(place_id)
            .await
            .map_err(|err| Self::map_detail_error(err, place_id))?;
        let enriched = self.enricher.enrich_one(&details.to_place()).await;
        self.cache
            .put_json(TtlClass::Intel, place_id, &enriched)
            .await;
        Ok(enriched)
    }

    fn map_detail_error(err: DirectoryError, place_id: &str) -> ApiError {
        match err {
            DirectoryError::RequestFailed { status: 404, .. } => {
                ApiError::place_not_found(place_id)
            }
            other => other.into(),
        }
    }

    // ========================================================================
    // TRENDS
    // ========================================================================

    /// Area trend summary. The analytics backend behind this is out of
    /// scope; the summary is assembled statically and cached under the
    /// slowest-moving class.
    pub async fn trends(&self) -> TrendsResponse {
        if let Some(mut response) = self
            .cache
            .get_json::<TrendsResponse>(TtlClass::Trends, TRENDS_KEY)
            .await
        {
            response.cached = true;
            return response;
        }

        let response = TrendsResponse {
            trends: TrendSummary {
                trending_categories: vec![
                    "coffee".to_string(),
                    "restaurants".to_string(),
                    "fitness".to_string(),
                ],
                peak_hours: vec!["12:00-14:00".to_string(), "18:00-20:00".to_string()],
                popular_areas: vec!["downtown".to_string(), "business district".to_string()],
            },
            generated_at: Utc::now(),
            cached: false,
        };
        self.cache
            .put_json(TtlClass::Trends, TRENDS_KEY, &response)
            .await;
        response
    }
}

#[cfg(test)]
mod tests {
    use vicinity_core::Place;

    use super::*;

    fn enriched_with_score(id: &str, score: f64) -> EnrichedPlace {
        let mut record = EnrichedPlace::degraded(
            &Place {
                fsq_id: id.to_string(),
                name: id.to_string(),
                ..Default::default()
            },
            0,
        );
        record.business_intelligence.popularity_score = score;
        record
    }

    #[test]
    fn test_filter_popular_keeps_threshold_and_order() {
        let enriched = vec![
            enriched_with_score("a", 9.0),
            enriched_with_score("b", 6.5),
            enriched_with_score("c", 7.0),
            enriched_with_score("d", 3.0),
        ];
        let popular = filter_popular(enriched);
        let scores: Vec<f64> = popular
            .iter()
            .map(|place| place.business_intelligence.popularity_score)
            .collect();
        assert_eq!(scores, vec![9.0, 7.0]);
        assert_eq!(popular[0].fsq_id, "a");
        assert_eq!(popular[1].fsq_id, "c");
    }

    #[test]
    fn test_filter_popular_empty_input() {
        assert!(filter_popular(Vec::new()).is_empty());
    }
}
