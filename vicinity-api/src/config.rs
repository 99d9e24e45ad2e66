//! API Configuration Module
//!
//! Configuration for the gateway binary: bind address, collaborator
//! endpoints, rate limiting, and CORS. Loaded from environment variables
//! with sensible defaults for development.

use std::time::Duration;

// ============================================================================
// GATEWAY CONFIGURATION
// ============================================================================

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    // ========================================================================
    // Server
    // ========================================================================
    /// Bind host for the HTTP server.
    pub bind_host: String,

    /// Bind port for the HTTP server.
    pub bind_port: u16,

    // ========================================================================
    // Collaborators
    // ========================================================================
    /// API key for the place directory.
    pub directory_api_key: String,

    /// Base URL of the place directory.
    pub directory_base_url: String,

    /// Base URL of the insight engine.
    pub insight_engine_url: String,

    // ========================================================================
    // Rate Limiting
    // ========================================================================
    /// Whether rate limiting is enabled.
    pub rate_limit_enabled: bool,

    /// Requests allowed per client per window.
    pub rate_limit_requests: u32,

    /// Window over which the request quota applies.
    pub rate_limit_window: Duration,

    // ========================================================================
    // CORS
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            bind_port: 8080,

            directory_api_key: String::new(),
            directory_base_url: "https://api.foursquare.com/v3".to_string(),
            insight_engine_url: "http://localhost:5000".to_string(),

            rate_limit_enabled: true,
            rate_limit_requests: 100,
            rate_limit_window: Duration::from_secs(3600),

            cors_origins: Vec::new(),
        }
    }
}

impl GatewayConfig {
    /// Create GatewayConfig from environment variables.
    ///
    /// Environment variables:
    /// - `VICINITY_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT` / `VICINITY_PORT`: Bind port (default: 8080)
    /// - `VICINITY_DIRECTORY_API_KEY`: Place directory API key
    /// - `VICINITY_DIRECTORY_URL`: Place directory base URL
    /// - `VICINITY_INSIGHT_ENGINE_URL`: Insight engine base URL
    /// - `VICINITY_RATE_LIMIT_ENABLED`: "true" or "false" (default: true)
    /// - `VICINITY_RATE_LIMIT_REQUESTS`: Requests per window (default: 100)
    /// - `VICINITY_RATE_LIMIT_WINDOW_SECS`: Window length (default: 3600)
    /// - `VICINITY_CORS_ORIGINS`: Comma-separated allowed origins
    ///
    /// Invalid numeric values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_host = std::env::var("VICINITY_BIND").unwrap_or(defaults.bind_host);

        let bind_port = std::env::var("PORT")
            .ok()
            .or_else(|| std::env::var("VICINITY_PORT").ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.bind_port);

        let directory_api_key =
            std::env::var("VICINITY_DIRECTORY_API_KEY").unwrap_or(defaults.directory_api_key);

        let directory_base_url =
            std::env::var("VICINITY_DIRECTORY_URL").unwrap_or(defaults.directory_base_url);

        let insight_engine_url =
            std::env::var("VICINITY_INSIGHT_ENGINE_URL").unwrap_or(defaults.insight_engine_url);

        let rate_limit_enabled = std::env::var("VICINITY_RATE_LIMIT_ENABLED")
            .ok()
            .map(|value| value.to_lowercase() != "false")
            .unwrap_or(defaults.rate_limit_enabled);

        let rate_limit_requests = std::env::var("VICINITY_RATE_LIMIT_REQUESTS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.rate_limit_requests);

        let rate_limit_window = std::env::var("VICINITY_RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.rate_limit_window);

        let cors_origins = std::env::var("VICINITY_CORS_ORIGINS")
            .ok()
            .map(|value| {
                value
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Self {
            bind_host,
            bind_port,
            directory_api_key,
            directory_base_url,
            insight_engine_url,
            rate_limit_enabled,
            rate_limit_requests,
            rate_limit_window,
            cors_origins,
        }
    }

    /// Burst capacity: 10% of the quota, at least one token.
    pub fn rate_limit_burst(&self) -> u32 {
        (self.rate_limit_requests / 10).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.bind_port, 8080);
        assert!(config.rate_limit_enabled);
        assert_eq!(config.rate_limit_requests, 100);
        assert_eq!(config.rate_limit_window, Duration::from_secs(3600));
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_burst_is_ten_percent_of_quota() {
        let mut config = GatewayConfig::default();
        assert_eq!(config.rate_limit_burst(), 10);

        config.rate_limit_requests = 45;
        assert_eq!(config.rate_limit_burst(), 4);

        // Small quotas still allow one request.
        config.rate_limit_requests = 5;
        assert_eq!(config.rate_limit_burst(), 1);
    }
}
