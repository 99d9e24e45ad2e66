//! Place and query types.
//!
//! `Place` is the raw record produced by the place-directory collaborator;
//! it is immutable once received. `PlaceQuery` is the normalized search
//! input that cache keys are derived from, so its field set and defaults
//! are part of the cache contract.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Default search radius in meters when the client does not supply one.
pub const DEFAULT_RADIUS_M: u32 = 1000;

/// Default result limit when the client does not supply one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Maximum accepted search radius in meters.
pub const MAX_RADIUS_M: u32 = 100_000;

/// Maximum accepted result limit (directory-side cap).
pub const MAX_LIMIT: u32 = 50;

// ============================================================================
// QUERY
// ============================================================================

/// Normalized search input.
///
/// Two logically identical queries must compare equal field-for-field,
/// because the cache key is a pure function of these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlaceQuery {
    pub lat: f64,
    pub lng: f64,
    /// Free-text query, already trimmed; `None` when absent or blank.
    pub query: Option<String>,
    /// Comma-separated directory category filter.
    pub categories: Option<String>,
    pub radius: u32,
    pub limit: u32,
}

impl PlaceQuery {
    /// Create a query centered on the given coordinates with default
    /// radius and limit.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            query: None,
            categories: None,
            radius: DEFAULT_RADIUS_M,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Validate coordinate ranges and numeric bounds.
    ///
    /// Coordinate presence is checked at the HTTP boundary; by the time a
    /// `PlaceQuery` exists the coordinates are set, but they may still be
    /// out of range.
    pub fn validate(&self) -> Result<(), QueryError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(QueryError::InvalidCoordinate {
                field: "lat",
                value: self.lat,
            });
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(QueryError::InvalidCoordinate {
                field: "lng",
                value: self.lng,
            });
        }
        if self.radius == 0 || self.radius > MAX_RADIUS_M {
            return Err(QueryError::InvalidValue {
                field: "radius",
                reason: format!("must be between 1 and {}", MAX_RADIUS_M),
            });
        }
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(QueryError::InvalidValue {
                field: "limit",
                reason: format!("must be between 1 and {}", MAX_LIMIT),
            });
        }
        Ok(())
    }
}

// ============================================================================
// RAW PLACE RECORDS
// ============================================================================

/// Street-level location of a place.
///
/// Every field is typed and defaulted; directory payloads are never passed
/// through as untyped JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlaceLocation {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub cross_street: String,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
}

/// Directory category icon fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoryIcon {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

/// A directory category assigned to a place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlaceCategory {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: CategoryIcon,
}

/// Raw place record as returned by the directory search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Place {
    pub fsq_id: String,
    pub name: String,
    #[serde(default)]
    pub location: PlaceLocation,
    #[serde(default)]
    pub categories: Vec<PlaceCategory>,
    /// Distance from the query point in meters.
    #[serde(default)]
    pub distance: u32,
}

// ============================================================================
// EXTENDED DETAIL RECORD
// ============================================================================

/// One regular opening interval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OpeningSlot {
    #[serde(default)]
    pub close: String,
    #[serde(default)]
    pub day: u8,
    #[serde(default)]
    pub open: String,
}

/// Opening hours block from the directory detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OpeningHours {
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub is_local_holiday: bool,
    #[serde(default)]
    pub open_now: bool,
    #[serde(default)]
    pub regular: Vec<OpeningSlot>,
}

/// Aggregate activity counters for a place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlaceStats {
    #[serde(default)]
    pub total_photos: u32,
    #[serde(default)]
    pub total_ratings: u32,
    #[serde(default)]
    pub total_tips: u32,
}

/// Extended place record from the directory detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlaceDetails {
    pub fsq_id: String,
    pub name: String,
    #[serde(default)]
    pub location: PlaceLocation,
    #[serde(default)]
    pub categories: Vec<PlaceCategory>,
    #[serde(default)]
    pub tel: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hours: OpeningHours,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stats: PlaceStats,
    /// Price tier, 1 (cheap) to 4 (expensive); 0 when unknown.
    #[serde(default)]
    pub price: u32,
}

impl PlaceDetails {
    /// Project the detail record down to the raw place shape used by the
    /// enrichment pipeline. Distance is not applicable for a direct lookup.
    pub fn to_place(&self) -> Place {
        Place {
            fsq_id: self.fsq_id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            categories: self.categories.clone(),
            distance: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = PlaceQuery::new(40.7128, -74.0060);
        assert_eq!(query.radius, DEFAULT_RADIUS_M);
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert!(query.query.is_none());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_query_coordinate_bounds() {
        let mut query = PlaceQuery::new(91.0, 0.0);
        assert_eq!(
            query.validate(),
            Err(QueryError::InvalidCoordinate {
                field: "lat",
                value: 91.0
            })
        );

        query = PlaceQuery::new(0.0, -181.0);
        assert_eq!(
            query.validate(),
            Err(QueryError::InvalidCoordinate {
                field: "lng",
                value: -181.0
            })
        );

        // Boundary values are accepted.
        query = PlaceQuery::new(-90.0, 180.0);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_query_numeric_bounds() {
        let mut query = PlaceQuery::new(0.0, 0.0);
        query.radius = 0;
        assert!(matches!(
            query.validate(),
            Err(QueryError::InvalidValue { field: "radius", .. })
        ));

        let mut query = PlaceQuery::new(0.0, 0.0);
        query.limit = MAX_LIMIT + 1;
        assert!(matches!(
            query.validate(),
            Err(QueryError::InvalidValue { field: "limit", .. })
        ));
    }

    #[test]
    fn test_details_to_place_clears_distance() {
        let details = PlaceDetails {
            fsq_id: "abc123".to_string(),
            name: "Blue Bottle".to_string(),
            rating: 9.1,
            ..Default::default()
        };
        let place = details.to_place();
        assert_eq!(place.fsq_id, "abc123");
        assert_eq!(place.distance, 0);
    }

    #[test]
    fn test_place_deserializes_with_missing_optional_fields() -> Result<(), serde_json::Error> {
        let place: Place =
            serde_json::from_str(r#"{"fsq_id": "x1", "name": "Corner Cafe"}"#)?;
        assert_eq!(place.fsq_id, "x1");
        assert!(place.categories.is_empty());
        assert_eq!(place.distance, 0);
        Ok(())
    }
}
