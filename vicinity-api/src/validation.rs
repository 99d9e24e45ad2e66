//! Request validation helpers.
//!
//! Validation happens before any downstream call: missing or out-of-range
//! parameters fail the request with a 400 and nothing else runs.

use vicinity_core::{PlaceQuery, DEFAULT_LIMIT, DEFAULT_RADIUS_M};

use crate::error::{ApiError, ApiResult};
use crate::types::SearchParams;

/// Require both coordinates to be present.
pub fn require_coordinates(lat: Option<f64>, lng: Option<f64>) -> ApiResult<(f64, f64)> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok((lat, lng)),
        _ => Err(ApiError::validation_failed(
            "Latitude and longitude are required",
        )),
    }
}

/// Normalize a free-text parameter: trimmed, blank becomes absent.
fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Build a validated `PlaceQuery` from raw search parameters.
pub fn build_query(params: SearchParams) -> ApiResult<PlaceQuery> {
    let (lat, lng) = require_coordinates(params.lat, params.lng)?;

    let query = PlaceQuery {
        lat,
        lng,
        query: normalize_text(params.query),
        categories: normalize_text(params.categories),
        radius: params.radius.unwrap_or(DEFAULT_RADIUS_M),
        limit: params.limit.unwrap_or(DEFAULT_LIMIT),
    };
    query.validate()?;
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_missing_coordinates_fail_fast() {
        let params = SearchParams {
            query: Some("coffee".to_string()),
            ..Default::default()
        };
        let err = build_query(params).expect_err("must fail");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_defaults_applied_when_absent() -> ApiResult<()> {
        let params = SearchParams {
            lat: Some(40.7),
            lng: Some(-74.0),
            ..Default::default()
        };
        let query = build_query(params)?;
        assert_eq!(query.radius, DEFAULT_RADIUS_M);
        assert_eq!(query.limit, DEFAULT_LIMIT);
        Ok(())
    }

    #[test]
    fn test_blank_text_normalizes_to_absent() -> ApiResult<()> {
        let params = SearchParams {
            lat: Some(40.7),
            lng: Some(-74.0),
            query: Some("   ".to_string()),
            categories: Some(" 13032 ".to_string()),
            ..Default::default()
        };
        let query = build_query(params)?;
        assert!(query.query.is_none());
        assert_eq!(query.categories.as_deref(), Some("13032"));
        Ok(())
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let params = SearchParams {
            lat: Some(95.0),
            lng: Some(-74.0),
            ..Default::default()
        };
        let err = build_query(params).expect_err("must fail");
        assert_eq!(err.code, ErrorCode::InvalidRange);
    }
}
