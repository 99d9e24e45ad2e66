//! Axum middleware for the gateway request path.

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, spawn_eviction_task, RateLimitState};
