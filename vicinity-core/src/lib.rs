//! Vicinity Core - Shared Data Types
//!
//! Pure data structures with no behavior beyond validation and fallback
//! construction. All other crates depend on this. This crate contains ONLY
//! data types and the error taxonomy - no I/O, no business logic.

pub mod error;
pub mod insight;
pub mod place;

pub use error::{
    CacheError, ConfigError, DirectoryError, InsightError, QueryError, VicinityError,
    VicinityResult,
};
pub use insight::{
    AccessibilityFeatures, AccessibilityInsights, BusinessInsights, EnrichedPlace,
    InclusiveRecommendations, LiveContext, RecommendationSummary, FALLBACK_ACCESSIBILITY_SCORE,
    FALLBACK_POPULARITY_SCORE, FALLBACK_SENTIMENT_SCORE, RAW_SOURCE_TAG,
};
pub use place::{
    CategoryIcon, OpeningHours, OpeningSlot, Place, PlaceCategory, PlaceDetails, PlaceLocation,
    PlaceQuery, PlaceStats, DEFAULT_LIMIT, DEFAULT_RADIUS_M, MAX_LIMIT, MAX_RADIUS_M,
};
