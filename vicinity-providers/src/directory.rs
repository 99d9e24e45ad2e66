//! Place-directory collaborator.
//!
//! Read-only queries against the upstream place directory. Calls are
//! bounded by a fixed timeout and never retried; a failure here is the one
//! fatal-upstream path in the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use vicinity_core::{DirectoryError, Place, PlaceDetails, PlaceQuery};

/// Fields requested on search results.
const SEARCH_FIELDS: &str = "fsq_id,name,location,categories,distance,tel,website,rating,price,hours";

/// Fields requested on the detail endpoint.
const DETAIL_FIELDS: &str =
    "fsq_id,name,location,categories,tel,website,email,description,hours,rating,stats,price";

/// Directory request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only place directory seam.
#[async_trait]
pub trait PlaceDirectory: Send + Sync {
    /// Search for places around the query center.
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, DirectoryError>;

    /// Fetch the extended record for a single place.
    async fn detail(&self, place_id: &str) -> Result<PlaceDetails, DirectoryError>;

    /// Verify the directory is reachable.
    async fn health_check(&self) -> Result<(), DirectoryError>;
}

// ============================================================================
// FOURSQUARE CLIENT
// ============================================================================

/// Wire shape of the directory search response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Place>,
}

/// Foursquare Places API client.
pub struct FoursquareDirectory {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl FoursquareDirectory {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.foursquare.com/v3";

    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, DirectoryError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .header("Authorization", &self.api_key)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    DirectoryError::Timeout
                } else {
                    DirectoryError::Transport {
                        message: err.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Directory request failed");
            return Err(DirectoryError::RequestFailed {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|err| DirectoryError::InvalidResponse {
                reason: err.to_string(),
            })
    }
}

/// Build the search query parameters for a normalized query.
fn search_params(query: &PlaceQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("ll", format!("{:.6},{:.6}", query.lat, query.lng))];
    if let Some(text) = query.query.as_deref() {
        params.push(("query", text.to_string()));
    }
    if let Some(categories) = query.categories.as_deref() {
        params.push(("categories", categories.to_string()));
    }
    params.push(("radius", query.radius.to_string()));
    params.push(("limit", query.limit.to_string()));
    params.push(("fields", SEARCH_FIELDS.to_string()));
    params
}

#[async_trait]
impl PlaceDirectory for FoursquareDirectory {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, DirectoryError> {
        let url = format!("{}/places/search", self.base_url);
        tracing::info!(
            lat = query.lat,
            lng = query.lng,
            radius = query.radius,
            text = query.query.as_deref().unwrap_or(""),
            "Searching places via directory"
        );

        let response: SearchResponse = self.get_json(&url, &search_params(query)).await?;
        tracing::info!(results = response.results.len(), "Directory search completed");
        Ok(response.results)
    }

    async fn detail(&self, place_id: &str) -> Result<PlaceDetails, DirectoryError> {
        let url = format!("{}/places/{}", self.base_url, place_id);
        tracing::info!(place_id = %place_id, "Fetching place details via directory");

        let details: PlaceDetails = self
            .get_json(&url, &[("fields", DETAIL_FIELDS.to_string())])
            .await?;
        tracing::info!(place_id = %place_id, place_name = %details.name, "Place details retrieved");
        Ok(details)
    }

    async fn health_check(&self) -> Result<(), DirectoryError> {
        let url = format!("{}/places/search", self.base_url);
        let _: SearchResponse = self
            .get_json(
                &url,
                &[
                    ("ll", "40.712800,-74.006000".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for FoursquareDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoursquareDirectory")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
