//! Data access for the Siteline engine.
//!
//! Responsibilities:
//! - Fetch venues per category from the venue search API and cache them on
//!   disk, one JSON file per category.
//! - Read candidate offices from a SQLite database.
//! - Convert both into the domain types of `siteline-core`.
//!
//! Boundaries:
//! - Do not encode scoring rules (those live in `siteline-core` and
//!   `siteline-scorer`).
//! - Rate limiting of the venue API happens here, never in the scorer.
//!
//! Invariants:
//! - Cache files are written atomically; a failed fetch never touches the
//!   cache.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod candidates;
pub mod venues;

pub use candidates::{CandidateFilter, CandidateSource, CandidateStoreError, SqliteCandidateStore};
pub use venues::{
    FetchError, FetchReport, Venue, VenueCache, VenueCacheError, VenueSearch, VenueSearchClient,
    VenueSearchConfig, VenueSearchError, VenueSource, venues_to_records,
};
