//! Insight-engine collaborator.
//!
//! The engine computes the four insight groups for one place per call. Its
//! scoring algorithm is an opaque external contract; the gateway only
//! defines the wire shapes and the timeout. Failures are recovered by the
//! enrichment fan-out, not here.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vicinity_core::{
    AccessibilityInsights, BusinessInsights, InsightError, LiveContext, Place,
    RecommendationSummary,
};

/// Enhancement request timeout. Longer than the directory timeout: one
/// engine call fans in several upstream signals.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Insight groups requested on every enhancement call.
const FEATURES: [&str; 4] = [
    "business_intelligence",
    "real_time_context",
    "accessibility_intelligence",
    "unified_recommendations",
];

// ============================================================================
// WIRE TYPES
// ============================================================================

/// Coordinates forwarded as enhancement context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Context the engine receives alongside the place record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceContext {
    pub timestamp: DateTime<Utc>,
    pub location: GeoPoint,
}

impl EnhanceContext {
    /// Context for enhancing `place` right now.
    pub fn for_place(place: &Place) -> Self {
        Self {
            timestamp: Utc::now(),
            location: GeoPoint {
                lat: place.location.lat,
                lng: place.location.lng,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct EnhanceRequest<'a> {
    place: &'a Place,
    context: &'a EnhanceContext,
    features: [&'static str; 4],
}

/// Engine response: the four insight groups plus engine-side metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InsightBundle {
    #[serde(default)]
    pub business_intelligence: BusinessInsights,
    #[serde(default)]
    pub real_time_context: LiveContext,
    #[serde(default)]
    pub accessibility_intelligence: AccessibilityInsights,
    #[serde(default)]
    pub unified_recommendations: RecommendationSummary,
    /// Engine-reported processing time; the gateway measures its own.
    #[serde(default)]
    pub processing_time_ms: f64,
    #[serde(default)]
    pub data_sources: Vec<String>,
}

// ============================================================================
// ENGINE SEAM
// ============================================================================

/// Per-item enrichment seam. Implementations must be thread-safe.
#[async_trait]
pub trait InsightEngine: Send + Sync {
    /// Compute the insight groups for one place.
    async fn enhance(
        &self,
        place: &Place,
        context: &EnhanceContext,
    ) -> Result<InsightBundle, InsightError>;

    /// Verify the engine is reachable.
    async fn health_check(&self) -> Result<(), InsightError>;
}

// ============================================================================
// REMOTE CLIENT
// ============================================================================

/// HTTP client for the remote insight engine.
pub struct RemoteInsightEngine {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteInsightEngine {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl InsightEngine for RemoteInsightEngine {
    async fn enhance(
        &self,
        place: &Place,
        context: &EnhanceContext,
    ) -> Result<InsightBundle, InsightError> {
        let url = format!("{}/api/v1/intelligence/enhance", self.base_url);
        let request = EnhanceRequest {
            place,
            context,
            features: FEATURES,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    InsightError::Timeout
                } else {
                    InsightError::Transport {
                        message: err.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::RequestFailed {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|err| InsightError::InvalidResponse {
                reason: err.to_string(),
            })
    }

    async fn health_check(&self) -> Result<(), InsightError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| InsightError::Transport {
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InsightError::RequestFailed {
                status: status.as_u16(),
                message: "health check failed".to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for RemoteInsightEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteInsightEngine")
            .field("base_url", &self.base_url)
            .finish()
    }
}
