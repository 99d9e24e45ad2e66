//! Vicinity Cache - Tiered TTL Cache-Aside Store
//!
//! This crate owns every cache decision the gateway makes: deterministic
//! key derivation from normalized query inputs, TTL classes tuned to how
//! fast each data shape goes stale, and a pluggable key-value backend seam.
//!
//! The store is a latency optimization, never a correctness dependency: any
//! backend failure degrades to a miss (reads) or a skipped write (writes),
//! logged but never surfaced to the caller.

pub mod backend;
pub mod keys;
pub mod singleflight;
pub mod store;

pub use backend::{CacheBackend, MemoryBackend};
pub use keys::{location_key, search_key, TtlClass};
pub use singleflight::{InflightGuard, Singleflight};
pub use store::{CacheStats, TieredCache};
