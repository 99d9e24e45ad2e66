//! Enriched place types.
//!
//! An `EnrichedPlace` is a raw `Place` plus the four insight groups the
//! engine computes for it, a provenance list of contributing data sources,
//! and a processing-time measurement. The pipeline guarantees exactly one
//! `EnrichedPlace` per input `Place`: when the engine call fails, a
//! deterministic fallback record is synthesized instead of dropping the
//! item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::place::{Place, PlaceCategory, PlaceLocation};

/// Neutral popularity score used by fallback records.
pub const FALLBACK_POPULARITY_SCORE: f64 = 5.0;

/// Neutral sentiment score used by fallback records.
pub const FALLBACK_SENTIMENT_SCORE: f64 = 3.5;

/// Accessibility score used by fallback records (unknown).
pub const FALLBACK_ACCESSIBILITY_SCORE: f64 = 0.0;

/// Provenance tag for the raw directory source.
pub const RAW_SOURCE_TAG: &str = "foursquare";

// ============================================================================
// INSIGHT GROUPS
// ============================================================================

/// Business-level insights for a place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BusinessInsights {
    pub popularity_score: f64,
    pub sentiment_score: f64,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub ideal_for: Vec<String>,
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub atmosphere: String,
    #[serde(default)]
    pub trending_score: f64,
}

/// Live contextual information for a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LiveContext {
    #[serde(default)]
    pub current_status: String,
    #[serde(default)]
    pub crowd_level: String,
    #[serde(default)]
    pub best_visit_times: Vec<String>,
    #[serde(default)]
    pub live_events: Vec<String>,
    #[serde(default)]
    pub estimated_wait_time: String,
    #[serde(default)]
    pub weather_impact: String,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub confidence_score: f64,
}

impl Default for LiveContext {
    fn default() -> Self {
        Self {
            current_status: String::new(),
            crowd_level: String::new(),
            best_visit_times: Vec::new(),
            live_events: Vec::new(),
            estimated_wait_time: String::new(),
            weather_impact: String::new(),
            last_updated: Utc::now(),
            confidence_score: 0.0,
        }
    }
}

/// Physical accessibility features of a venue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccessibilityFeatures {
    pub ramp_access: bool,
    pub elevator: bool,
    pub accessible_restrooms: bool,
    pub braille_signage: bool,
    pub hearing_loop: bool,
    pub wide_entrances: bool,
    pub accessible_parking: bool,
}

/// Inclusive visit recommendations grouped by need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InclusiveRecommendations {
    #[serde(default)]
    pub mobility_friendly_areas: Vec<String>,
    #[serde(default)]
    pub sensory_accommodations: Vec<String>,
    #[serde(default)]
    pub cognitive_support: Vec<String>,
}

/// Accessibility insights for a place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccessibilityInsights {
    pub wheelchair_accessible: bool,
    pub accessibility_score: f64,
    #[serde(default)]
    pub features: AccessibilityFeatures,
    #[serde(default)]
    pub inclusive_recommendations: InclusiveRecommendations,
}

/// Unified recommendation summary across all insight groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecommendationSummary {
    pub confidence_score: f64,
    #[serde(default)]
    pub personalized_insights: Vec<String>,
    #[serde(default)]
    pub alternative_suggestions: Vec<String>,
    #[serde(default)]
    pub optimal_visit_strategy: String,
    #[serde(default)]
    pub accessibility_notes: Vec<String>,
}

// ============================================================================
// ENRICHED PLACE
// ============================================================================

/// A raw place record combined with its computed insight groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EnrichedPlace {
    pub fsq_id: String,
    pub name: String,
    pub location: PlaceLocation,
    pub categories: Vec<PlaceCategory>,
    /// Distance from the query point in meters.
    pub distance: u32,

    pub business_intelligence: BusinessInsights,
    pub real_time_context: LiveContext,
    pub accessibility_intelligence: AccessibilityInsights,
    pub unified_recommendations: RecommendationSummary,

    /// Wall-clock time the gateway spent producing this record.
    pub processing_time_ms: u64,
    /// Data sources that contributed to this record.
    pub data_sources: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl EnrichedPlace {
    /// Deterministic fallback record for a place whose enrichment call
    /// failed. Every score is a fixed, conservative constant so repeated
    /// runs are reproducible; only the raw directory source is credited in
    /// the provenance list.
    pub fn degraded(place: &Place, processing_time_ms: u64) -> Self {
        Self {
            fsq_id: place.fsq_id.clone(),
            name: place.name.clone(),
            location: place.location.clone(),
            categories: place.categories.clone(),
            distance: place.distance,

            business_intelligence: BusinessInsights {
                popularity_score: FALLBACK_POPULARITY_SCORE,
                sentiment_score: FALLBACK_SENTIMENT_SCORE,
                specialties: Vec::new(),
                ideal_for: Vec::new(),
                price_range: "unknown".to_string(),
                atmosphere: "unknown".to_string(),
                trending_score: 0.0,
            },
            real_time_context: LiveContext {
                current_status: "unknown".to_string(),
                crowd_level: "unknown".to_string(),
                best_visit_times: Vec::new(),
                live_events: Vec::new(),
                estimated_wait_time: "unknown".to_string(),
                weather_impact: "none".to_string(),
                last_updated: Utc::now(),
                confidence_score: 0.0,
            },
            accessibility_intelligence: AccessibilityInsights {
                // Conservative default: never claim accessibility we
                // cannot verify.
                wheelchair_accessible: false,
                accessibility_score: FALLBACK_ACCESSIBILITY_SCORE,
                features: AccessibilityFeatures::default(),
                inclusive_recommendations: InclusiveRecommendations::default(),
            },
            unified_recommendations: RecommendationSummary {
                confidence_score: 0.0,
                personalized_insights: vec!["Basic place information available".to_string()],
                alternative_suggestions: Vec::new(),
                optimal_visit_strategy: "Contact venue for current information".to_string(),
                accessibility_notes: vec![
                    "Accessibility information not available - please contact venue".to_string(),
                ],
            },

            processing_time_ms,
            data_sources: vec![RAW_SOURCE_TAG.to_string()],
            last_updated: Utc::now(),
        }
    }
}
