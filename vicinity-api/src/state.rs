//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use vicinity_cache::TieredCache;
use vicinity_providers::{Enricher, InsightEngine, PlaceDirectory};

use crate::config::GatewayConfig;
use crate::services::PlaceService;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator for the place read paths.
    pub service: PlaceService,
    /// Directory collaborator, kept for health probes.
    pub directory: Arc<dyn PlaceDirectory>,
    /// Insight engine collaborator, kept for health probes.
    pub engine: Arc<dyn InsightEngine>,
    /// Cache store, exposed for the operational endpoints.
    pub cache: TieredCache,
    pub config: Arc<GatewayConfig>,
    pub start_time: Instant,
}

impl AppState {
    /// Wire the collaborators into the service pipeline.
    pub fn new(
        directory: Arc<dyn PlaceDirectory>,
        engine: Arc<dyn InsightEngine>,
        cache: TieredCache,
        config: GatewayConfig,
    ) -> Self {
        let enricher = Enricher::new(Arc::clone(&engine));
        let service = PlaceService::new(Arc::clone(&directory), enricher, cache.clone());
        Self {
            service,
            directory,
            engine,
            cache,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }
}
