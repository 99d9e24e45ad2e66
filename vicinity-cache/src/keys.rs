//! TTL classes and deterministic cache-key derivation.
//!
//! Keys are a pure function of normalized query inputs: build a canonical
//! string from the fields that define the query, hash it to a compact
//! fixed-length token, and prefix it with the class namespace so
//! invalidation and key counting can operate per class.

use std::time::Duration;

use sha2::{Digest, Sha256};
use vicinity_core::PlaceQuery;

/// Truncated hex length of derived keys. 128 bits of SHA-256 keeps keys
/// short while collisions stay negligible at cache scale.
const KEY_HEX_LEN: usize = 32;

// ============================================================================
// TTL CLASSES
// ============================================================================

/// A named category of cached data with its own namespace prefix and
/// expiry, tied to how often that data shape changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TtlClass {
    /// Search result sets. Volatile: new venues, changed rankings.
    Search,
    /// Per-place insight records. Moderately stable.
    Intel,
    /// Extended place details. Rarely change.
    Details,
    /// Aggregated popular-places lists.
    Popular,
    /// Trend summaries.
    Trends,
}

impl TtlClass {
    /// Namespace prefix for this class.
    pub fn prefix(&self) -> &'static str {
        match self {
            TtlClass::Search => "search:",
            TtlClass::Intel => "intel:",
            TtlClass::Details => "details:",
            TtlClass::Popular => "popular:",
            TtlClass::Trends => "trends:",
        }
    }

    /// Expiry for entries of this class.
    pub fn ttl(&self) -> Duration {
        match self {
            TtlClass::Search => Duration::from_secs(5 * 60),
            TtlClass::Intel => Duration::from_secs(15 * 60),
            TtlClass::Details => Duration::from_secs(30 * 60),
            TtlClass::Popular => Duration::from_secs(60 * 60),
            TtlClass::Trends => Duration::from_secs(2 * 60 * 60),
        }
    }

    /// All classes, in namespace order. Used for per-class stats.
    pub fn all() -> [TtlClass; 5] {
        [
            TtlClass::Search,
            TtlClass::Intel,
            TtlClass::Details,
            TtlClass::Popular,
            TtlClass::Trends,
        ]
    }
}

// ============================================================================
// KEY DERIVATION
// ============================================================================

/// Derive the cache key for a search query.
///
/// The canonical string covers every field that distinguishes one logical
/// query from another; coordinates are rounded to six decimals (about 11 cm)
/// so float noise below the directory's own resolution cannot split keys.
pub fn search_key(query: &PlaceQuery) -> String {
    let canonical = format!(
        "{:.6},{:.6},{},{},{},{}",
        query.lat,
        query.lng,
        query.query.as_deref().unwrap_or(""),
        query.categories.as_deref().unwrap_or(""),
        query.radius,
        query.limit,
    );
    content_key(&canonical)
}

/// Derive the location key for area-scoped aggregates (popular places).
///
/// Four decimals (about 11 m) deliberately buckets nearby clients onto the
/// same aggregate entry.
pub fn location_key(lat: f64, lng: f64) -> String {
    format!("{:.4},{:.4}", lat, lng)
}

/// Hash a canonical string to a compact fixed-length key token.
fn content_key(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    let mut hex = hex::encode(digest);
    hex.truncate(KEY_HEX_LEN);
    hex
}
