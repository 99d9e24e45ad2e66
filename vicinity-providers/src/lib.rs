//! Vicinity Providers - External Collaborator Clients
//!
//! Trait seams and HTTP clients for the two remote collaborators the
//! gateway composes: the place directory (raw candidates + details) and
//! the insight engine (per-place enrichment). The enrichment fan-out
//! engine lives here too, since it is the only consumer of the engine
//! seam.
//!
//! Both collaborators are fallible remote calls with their own timeouts
//! and no retries; what differs is blast radius. A directory failure is
//! fatal to the request. An engine failure degrades one record.

pub mod directory;
pub mod enrich;
pub mod insight;

pub use directory::{FoursquareDirectory, PlaceDirectory};
pub use enrich::{Enricher, MAX_CONCURRENT_ENHANCEMENTS};
pub use insight::{EnhanceContext, InsightBundle, InsightEngine, RemoteInsightEngine};
