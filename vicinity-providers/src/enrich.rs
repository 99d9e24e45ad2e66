//! Bounded-concurrency enrichment fan-out.
//!
//! Given N raw places, produce exactly N enriched records, index-for-index
//! correspondent with the input, no matter which enhancement call finishes
//! first. At most `MAX_CONCURRENT_ENHANCEMENTS` calls are in flight at
//! once, so batch latency is bounded by ceil(N / 5) x per-call latency and
//! the engine is never flooded by a bursty fan-out.
//!
//! Per-item failures degrade that item to the deterministic fallback
//! record; the batch itself cannot fail. Sub-tasks run inside a `JoinSet`,
//! so dropping the batch future aborts whatever is still in flight.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use vicinity_core::{EnrichedPlace, Place};

use crate::insight::{EnhanceContext, InsightEngine};

/// Maximum enhancement calls in flight per batch.
pub const MAX_CONCURRENT_ENHANCEMENTS: usize = 5;

/// Enrichment fan-out engine over an insight-engine seam.
#[derive(Clone)]
pub struct Enricher {
    engine: Arc<dyn InsightEngine>,
    permits: Arc<Semaphore>,
}

impl Enricher {
    pub fn new(engine: Arc<dyn InsightEngine>) -> Self {
        Self::with_concurrency(engine, MAX_CONCURRENT_ENHANCEMENTS)
    }

    /// Override the admission bound. The default is right for production;
    /// tests use this to tighten or widen the gate.
    pub fn with_concurrency(engine: Arc<dyn InsightEngine>, max_in_flight: usize) -> Self {
        Self {
            engine,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Enrich a single place. Never fails: an engine error degrades to the
    /// fallback record.
    pub async fn enrich_one(&self, place: &Place) -> EnrichedPlace {
        enhance_with_fallback(self.engine.as_ref(), place).await
    }

    /// Enrich a batch, preserving input order and cardinality.
    ///
    /// Blocks until every item has either succeeded or fallen back; no
    /// partial results are emitted.
    pub async fn enrich_batch(&self, places: &[Place]) -> Vec<EnrichedPlace> {
        if places.is_empty() {
            return Vec::new();
        }

        let mut tasks: JoinSet<(usize, EnrichedPlace)> = JoinSet::new();
        for (index, place) in places.iter().enumerate() {
            let engine = Arc::clone(&self.engine);
            let permits = Arc::clone(&self.permits);
            let place = place.clone();
            tasks.spawn(async move {
                let started = Instant::now();
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        // Semaphore closed: nothing can run, degrade.
                        return (
                            index,
                            EnrichedPlace::degraded(&place, started.elapsed().as_millis() as u64),
                        );
                    }
                };
                (index, enhance_with_fallback(engine.as_ref(), &place).await)
            });
        }

        // Completion order is unconstrained; results land in fixed slots.
        let mut slots: Vec<Option<EnrichedPlace>> = places.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, enriched)) => slots[index] = Some(enriched),
                Err(err) => {
                    tracing::warn!(error = %err, "Enrichment sub-task did not complete");
                }
            }
        }

        slots
            .into_iter()
            .zip(places.iter())
            .map(|(slot, place)| slot.unwrap_or_else(|| EnrichedPlace::degraded(place, 0)))
            .collect()
    }
}

/// Run one enhancement call, synthesizing the fallback record on failure.
async fn enhance_with_fallback(engine: &dyn InsightEngine, place: &Place) -> EnrichedPlace {
    let started = Instant::now();
    let context = EnhanceContext::for_place(place);

    match engine.enhance(place, &context).await {
        Ok(bundle) => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            tracing::info!(
                place_id = %place.fsq_id,
                place_name = %place.name,
                processing_time_ms = elapsed_ms,
                "Place enrichment completed"
            );
            EnrichedPlace {
                fsq_id: place.fsq_id.clone(),
                name: place.name.clone(),
                location: place.location.clone(),
                categories: place.categories.clone(),
                distance: place.distance,

                business_intelligence: bundle.business_intelligence,
                real_time_context: bundle.real_time_context,
                accessibility_intelligence: bundle.accessibility_intelligence,
                unified_recommendations: bundle.unified_recommendations,

                processing_time_ms: elapsed_ms,
                data_sources: bundle.data_sources,
                last_updated: chrono::Utc::now(),
            }
        }
        Err(err) => {
            tracing::warn!(
                place_id = %place.fsq_id,
                place_name = %place.name,
                error = %err,
                "Enrichment failed, returning fallback record"
            );
            EnrichedPlace::degraded(place, started.elapsed().as_millis() as u64)
        }
    }
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher")
            .field("available_permits", &self.permits.available_permits())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use vicinity_core::{BusinessInsights, InsightError};

    use super::*;
    use crate::insight::InsightBundle;

    fn places(count: usize) -> Vec<Place> {
        (0..count)
            .map(|i| Place {
                fsq_id: format!("p{}", i),
                name: format!("Place {}", i),
                distance: (i as u32) * 100,
                ..Default::default()
            })
            .collect()
    }

    /// Engine that scores each place by its numeric id suffix, optionally
    /// sleeping longer for chosen places.
    struct ScoringEngine {
        slow_place: Option<String>,
    }

    #[async_trait]
    impl InsightEngine for ScoringEngine {
        async fn enhance(
            &self,
            place: &Place,
            _context: &EnhanceContext,
        ) -> Result<InsightBundle, InsightError> {
            let delay = if self.slow_place.as_deref() == Some(place.fsq_id.as_str()) {
                Duration::from_millis(120)
            } else {
                Duration::from_millis(10)
            };
            tokio::time::sleep(delay).await;

            let index: f64 = place
                .fsq_id
                .trim_start_matches('p')
                .parse()
                .unwrap_or_default();
            Ok(InsightBundle {
                business_intelligence: BusinessInsights {
                    popularity_score: index,
                    sentiment_score: 4.0,
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

    /// Engine that always fails.
    struct FailingEngine;

    #[async_trait]
    impl InsightEngine for FailingEngine {
        async fn enhance(
            &self,
            _place: &Place,
            _context: &EnhanceContext,
        ) -> Result<InsightBundle, InsightError> {
            Err(InsightError::Timeout)
        }

        async fn health_check(&self) -> Result<(), InsightError> {
            Ok(())
        }
    }

    /// Engine that fails only for one place id.
    struct PartialEngine {
        failing_place: String,
    }

    #[async_trait]
    impl InsightEngine for PartialEngine {
        async fn enhance(
            &self,
            place: &Place,
            context: &EnhanceContext,
        ) -> Result<InsightBundle, InsightError> {
            if place.fsq_id == self.failing_place {
                return Err(InsightError::RequestFailed {
                    status: 503,
                    message: "engine overloaded".to_string(),
                });
            }
            ScoringEngine { slow_place: None }.enhance(place, context).await
        }

        async fn health_check(&self) -> Result<(), InsightError> {
            Ok(())
        }
    }

    /// Engine that tracks the peak number of simultaneous calls.
    struct CountingEngine {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl CountingEngine {
        fn new() -> Self {
            Self {
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl InsightEngine for CountingEngine {
        async fn enhance(
            &self,
            _place: &Place,
            _context: &EnhanceContext,
        ) -> Result<InsightBundle, InsightError> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(25)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(InsightBundle::default())
        }

        async fn health_check(&self) -> Result<(), InsightError> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_batch_preserves_order_when_first_item_is_slowest() {
        let enricher = Enricher::new(Arc::new(ScoringEngine {
            slow_place: Some("p0".to_string()),
        }));
        let input = places(5);
        let enriched = enricher.enrich_batch(&input).await;

        assert_eq!(enriched.len(), 5);
        for (index, record) in enriched.iter().enumerate() {
            assert_eq!(record.fsq_id, format!("p{}", index));
            assert_eq!(
                record.business_intelligence.popularity_score,
                index as f64
            );
        }
    }

    #[tokio::test]
    async fn test_failing_engine_degrades_every_item_deterministically() {
        let enricher = Enricher::new(Arc::new(FailingEngine));
        let input = places(3);
        let enriched = enricher.enrich_batch(&input).await;

        assert_eq!(enriched.len(), 3);
        for record in &enriched {
            assert_eq!(record.business_intelligence.popularity_score, 5.0);
            assert_eq!(record.business_intelligence.sentiment_score, 3.5);
            assert_eq!(record.accessibility_intelligence.accessibility_score, 0.0);
            assert!(!record.accessibility_intelligence.wheelchair_accessible);
            assert_eq!(record.data_sources, vec!["foursquare".to_string()]);
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_poison_the_batch() {
        let enricher = Enricher::new(Arc::new(PartialEngine {
            failing_place: "p2".to_string(),
        }));
        let input = places(4);
        let enriched = enricher.enrich_batch(&input).await;

        assert_eq!(enriched.len(), 4);
        assert_eq!(enriched[2].business_intelligence.popularity_score, 5.0);
        assert_eq!(enriched[2].data_sources, vec!["foursquare".to_string()]);
        // Neighbors keep their computed scores.
        assert_eq!(enriched[1].business_intelligence.popularity_score, 1.0);
        assert_eq!(enriched[3].business_intelligence.popularity_score, 3.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_batch_never_exceeds_concurrency_bound() {
        let engine = Arc::new(CountingEngine::new());
        let enricher = Enricher::new(Arc::clone(&engine) as Arc<dyn InsightEngine>);
        let input = places(20);
        let enriched = enricher.enrich_batch(&input).await;

        assert_eq!(enriched.len(), 20);
        assert!(
            engine.peak.load(Ordering::SeqCst) <= MAX_CONCURRENT_ENHANCEMENTS,
            "peak concurrency {} exceeded bound",
            engine.peak.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn test_empty_batch_returns_empty() {
        let enricher = Enricher::new(Arc::new(FailingEngine));
        assert!(enricher.enrich_batch(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_enrich_one_uses_engine_result() {
        let enricher = Enricher::new(Arc::new(ScoringEngine { slow_place: None }));
        let place = places(7).pop().expect("non-empty");
        let enriched = enricher.enrich_one(&place).await;
        assert_eq!(enriched.business_intelligence.popularity_score, 6.0);
        assert_eq!(
            enriched.data_sources,
            vec!["foursquare".to_string(), "intelligence".to_string()]
        );
    }
}
