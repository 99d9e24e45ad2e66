//! Shared mock collaborators for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use vicinity_api::{AppState, GatewayConfig, PlaceService};
use vicinity_cache::{MemoryBackend, TieredCache};
use vicinity_core::{
    BusinessInsights, DirectoryError, InsightError, Place, PlaceDetails, PlaceQuery,
};
use vicinity_providers::{EnhanceContext, Enricher, InsightBundle, InsightEngine, PlaceDirectory};

/// Build `count` places with ids p0..p{count-1}.
pub fn places(count: usize) -> Vec<Place> {
    (0..count)
        .map(|i| Place {
            fsq_id: format!("p{}", i),
            name: format!("Place {}", i),
            distance: (i as u32) * 100,
            ..Default::default()
        })
        .collect()
}

/// Directory mock with configurable failure, latency, and call counting.
pub struct MockDirectory {
    pub places: Vec<Place>,
    pub fail_search: bool,
    pub detail_status: Option<u16>,
    pub delay: Duration,
    pub search_calls: AtomicUsize,
}

impl MockDirectory {
    pub fn serving(places: Vec<Place>) -> Self {
        Self {
            places,
            fail_search: false,
            detail_status: None,
            delay: Duration::ZERO,
            search_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_search: true,
            detail_status: Some(503),
            ..Self::serving(Vec::new())
        }
    }

    pub fn missing_place() -> Self {
        Self {
            detail_status: Some(404),
            ..Self::serving(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl PlaceDirectory for MockDirectory {
    async fn search(&self, _query: &PlaceQuery) -> Result<Vec<Place>, DirectoryError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_search {
            return Err(DirectoryError::Timeout);
        }
        Ok(self.places.clone())
    }

    async fn detail(&self, place_id: &str) -> Result<PlaceDetails, DirectoryError> {
        if let Some(status) = self.detail_status {
            return Err(DirectoryError::RequestFailed {
                status,
                message: "detail unavailable".to_string(),
            });
        }
        Ok(PlaceDetails {
            fsq_id: place_id.to_string(),
            name: format!("Detail {}", place_id),
            rating: 8.4,
            ..Default::default()
        })
    }

    async fn health_check(&self) -> Result<(), DirectoryError> {
        Ok(())
    }
}

/// Engine mock scoring each place by its id suffix through `scores`,
/// falling back to the suffix itself.
pub struct ScoreEngine {
    pub scores: Vec<f64>,
}

impl ScoreEngine {
    pub fn by_index() -> Self {
        Self { scores: Vec::new() }
    }

    pub fn with_scores(scores: Vec<f64>) -> Self {
        Self { scores }
    }
}

#[async_trait]
impl InsightEngine for ScoreEngine {
    async fn enhance(
        &self,
        place: &Place,
        _context: &EnhanceContext,
    ) -> Result<InsightBundle, InsightError> {
        let index: usize = place
            .fsq_id
            .trim_start_matches('p')
            .parse()
            .unwrap_or_default();
        let score = self.scores.get(index).copied().unwrap_or(index as f64);
        Ok(InsightBundle {
            business_intelligence: BusinessInsights {
                popularity_score: score,
                sentiment_score: 4.1,
                ..Default::default()
            },
            data_sources: vec!["foursquare".to_string(), "intelligence".to_string()],
            ..Default::default()
        })
    }

    async fn health_check(&self) -> Result<(), InsightError> {
        Ok(())
    }
}

/// Engine mock that always fails.
pub struct FailEngine;

#[async_trait]
impl InsightEngine for FailEngine {
    async fn enhance(
        &self,
        _place: &Place,
        _context: &EnhanceContext,
    ) -> Result<InsightBundle, InsightError> {
        Err(InsightError::RequestFailed {
            status: 500,
            message: "engine down".to_string(),
        })
    }

    async fn health_check(&self) -> Result<(), InsightError> {
        Err(InsightError::Timeout)
    }
}

/// Wire a service over an in-memory cache.
pub fn service(directory: Arc<MockDirectory>, engine: Arc<dyn InsightEngine>) -> PlaceService {
    let cache = TieredCache::new(Arc::new(MemoryBackend::new()));
    PlaceService::new(directory, Enricher::new(engine), cache)
}

/// Wire full app state over an in-memory cache.
pub fn app_state(
    directory: Arc<MockDirectory>,
    engine: Arc<dyn InsightEngine>,
    config: GatewayConfig,
) -> AppState {
    let cache = TieredCache::new(Arc::new(MemoryBackend::new()));
    AppState::new(directory, engine, cache, config)
}

/// Loopback socket address for ConnectInfo extensions.
pub fn client_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 54321))
}
