//! Per-Client Rate Limiting Middleware
//!
//! Token-bucket admission control keyed by client IP. The effective steady
//! rate is quota/window and burst capacity is 10% of the quota. Rejections
//! carry a 429 with a fixed retry hint and a Retry-After header.
//!
//! Buckets live in a concurrent map; a background task evicts buckets idle
//! longer than an hour, keeping the admission path free of sweep work.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{clock::DefaultClock, Quota, RateLimiter};

use crate::config::GatewayConfig;
use crate::error::ApiError;

/// Type alias for the rate limiter we use.
type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    DefaultClock,
>;

/// Fixed retry hint returned with every rejection.
const RETRY_AFTER_SECS: u64 = 60;

/// Buckets idle longer than this are evicted.
const IDLE_EVICTION: Duration = Duration::from_secs(3600);

/// Cadence of the background eviction sweep.
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

// ============================================================================
// STATE
// ============================================================================

/// One client's bucket plus its idle-tracking timestamp, stored as seconds
/// since the limiter started so it can be updated without a write lock.
struct ClientLimiter {
    limiter: Arc<DirectRateLimiter>,
    last_seen_s: AtomicU64,
}

/// Shared state for the rate-limiting middleware.
#[derive(Clone)]
pub struct RateLimitState {
    enabled: bool,
    quota: Quota,
    clients: Arc<DashMap<IpAddr, ClientLimiter>>,
    started: Instant,
}

impl RateLimitState {
    /// Create rate-limit state from the gateway configuration.
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            enabled: config.rate_limit_enabled,
            quota: quota_for(config),
            clients: Arc::new(DashMap::new()),
            started: Instant::now(),
        }
    }

    /// Attempt to consume one token for `ip`, lazily creating its bucket.
    pub fn try_admit(&self, ip: IpAddr) -> bool {
        let now_s = self.started.elapsed().as_secs();
        let client = self.clients.entry(ip).or_insert_with(|| ClientLimiter {
            limiter: Arc::new(RateLimiter::direct(self.quota)),
            last_seen_s: AtomicU64::new(now_s),
        });
        client.last_seen_s.store(now_s, Ordering::Relaxed);
        client.limiter.check().is_ok()
    }

    /// Evict buckets idle beyond the threshold. Returns the eviction count.
    pub fn sweep_idle(&self) -> usize {
        self.sweep_idle_at(self.started.elapsed().as_secs())
    }

    fn sweep_idle_at(&self, now_s: u64) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, client| {
            now_s.saturating_sub(client.last_seen_s.load(Ordering::Relaxed))
                <= IDLE_EVICTION.as_secs()
        });
        before - self.clients.len()
    }

    /// Number of tracked clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

/// Token-bucket quota from the configured requests-per-window rate.
fn quota_for(config: &GatewayConfig) -> Quota {
    let requests = config.rate_limit_requests.max(1);
    let mut period = config
        .rate_limit_window
        .checked_div(requests)
        .unwrap_or(Duration::from_millis(10));
    if period.is_zero() {
        period = Duration::from_millis(10);
    }

    let burst = NonZeroU32::new(config.rate_limit_burst()).unwrap_or(NonZeroU32::MIN);
    Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
        .allow_burst(burst)
}

/// Spawn the background eviction task for the given limiter state.
pub fn spawn_eviction_task(state: &RateLimitState) -> tokio::task::JoinHandle<()> {
    let state = state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        // The first tick completes immediately; skip it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = state.sweep_idle();
            if evicted > 0 {
                tracing::debug!(evicted, "Evicted idle rate-limiter buckets");
            }
        }
    })
}

// ============================================================================
// MIDDLEWARE
// ============================================================================

/// Error type for the rate-limit middleware.
pub struct RateLimitError {
    /// Seconds the client should wait before retrying.
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let error = ApiError::too_many_requests(self.retry_after);
        let mut response = (StatusCode::TOO_MANY_REQUESTS, axum::Json(error)).into_response();
        response.headers_mut().insert(
            header::RETRY_AFTER,
            HeaderValue::from_str(&self.retry_after.to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("60")),
        );
        response
    }
}

/// Extract the client IP, considering proxy headers.
fn extract_client_ip(request: &Request, fallback: Option<IpAddr>) -> IpAddr {
    // X-Forwarded-For can contain multiple IPs; the first is the client.
    if let Some(forwarded_for) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded_for.split(',').next() {
            if let Ok(ip) = first.trim().parse() {
                return ip;
            }
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
    {
        if let Ok(ip) = real_ip.trim().parse() {
            return ip;
        }
    }

    fallback.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Rate-limiting middleware.
///
/// Admits or rejects before any handler work happens. When rate limited,
/// returns 429 Too Many Requests with a Retry-After header.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    if !state.enabled {
        return Ok(next.run(request).await);
    }

    let fallback = connect_info.map(|ConnectInfo(addr)| addr.ip());
    let client_ip = extract_client_ip(&request, fallback);

    if state.try_admit(client_ip) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(client = %client_ip, "Rate limit exceeded");
        Err(RateLimitError {
            retry_after: RETRY_AFTER_SECS,
        })
    }
}
