//! Request orchestration services.
//!
//! Services compose the cache store, the directory client, and the
//! enrichment fan-out into the gateway's read pipelines. Route handlers
//! stay thin: parse, validate, delegate here, serialize.

pub mod places;

pub use places::PlaceService;
