//! Tracing subscriber initialization.
//!
//! Structured logs via tracing-subscriber with an env-filter. The format
//! defaults to human-readable output; set `VICINITY_LOG_FORMAT=json` for
//! machine-shipped logs.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `VICINITY_LOG` follows the usual env-filter syntax (default "info").
/// Call once, from the binary entry point.
pub fn init_telemetry() {
    let filter =
        EnvFilter::try_from_env("VICINITY_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("VICINITY_LOG_FORMAT")
        .map(|value| value.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
