//! Router-level smoke tests: the full middleware stack over mock
//! collaborators, driven with in-process requests.

mod support;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use vicinity_api::{create_api_router, GatewayConfig};

use support::{app_state, client_addr, places, MockDirectory, ScoreEngine};

fn request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .extension(ConnectInfo(client_addr()))
        .body(Body::empty())
        .expect("request")
}

fn router_with(config: GatewayConfig) -> axum::Router {
    let directory = Arc::new(MockDirectory::serving(places(2)));
    let state = app_state(directory, Arc::new(ScoreEngine::by_index()), config);
    create_api_router(state)
}

#[tokio::test]
async fn test_ping_responds() {
    let app = router_with(GatewayConfig::default());
    let response = app
        .oneshot(request("/api/v1/health/ping"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_search_requires_coordinates() {
    let app = router_with(GatewayConfig::default());

    let missing = app
        .clone()
        .oneshot(request("/api/v1/places/search?query=coffee"))
        .await
        .expect("response");
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let ok = app
        .oneshot(request("/api/v1/places/search?lat=40.7128&lng=-74.0060"))
        .await
        .expect("response");
    assert_eq!(ok.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cache_stats_reports_after_search() {
    let app = router_with(GatewayConfig::default());

    let _ = app
        .clone()
        .oneshot(request("/api/v1/places/search?lat=40.7128&lng=-74.0060"))
        .await
        .expect("search response");

    let stats = app
        .oneshot(request("/api/v1/cache/stats"))
        .await
        .expect("stats response");
    assert_eq!(stats.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_rejects_burst_overflow_with_retry_hint() {
    // 10 requests per hour-long window with burst 1: the second request
    // must be rejected. Refill behavior is covered by the middleware unit
    // tests with a short window.
    let mut config = GatewayConfig::default();
    config.rate_limit_requests = 10;
    config.rate_limit_window = Duration::from_secs(3600);
    let app = router_with(config);

    let first = app
        .clone()
        .oneshot(request("/api/v1/health/ping"))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(request("/api/v1/health/ping"))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key("retry-after"));
}

#[tokio::test]
async fn test_disabled_rate_limiter_admits_everything() {
    let mut config = GatewayConfig::default();
    config.rate_limit_enabled = false;
    config.rate_limit_requests = 1;
    config.rate_limit_window = Duration::from_secs(3600);
    let app = router_with(config);

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(request("/api/v1/health/ping"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = router_with(GatewayConfig::default());
    let response = app
        .oneshot(request("/openapi.json"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}
