//! Facade crate for the Siteline office scouting engine.
//!
//! This crate re-exports the core domain types and exposes the concurrent
//! scorer and the data sources behind feature flags.

#![forbid(unsafe_code)]

pub use siteline_core::{
    Candidate, CategoryPolicy, Diagnostic, DiagnosticKind, GeoPoint, GeoPointError, LookupError,
    NearestFinder, PoiCategory, PoiIndex, PoiRecord, PolicyError, PolicyTable, Ranking,
    SCORE_DECIMALS, ScoredCandidate, UnknownCategory, distance_meters, normalized_score,
    round_score,
};

#[cfg(feature = "scorer")]
pub use siteline_scorer::{
    CancelMode, DEFAULT_LOOKUP_TIMEOUT, ScoreError, ScoringOptions, score_candidates,
    score_candidates_concurrently,
};

#[cfg(feature = "data")]
pub use siteline_data::{
    CandidateFilter, CandidateSource, CandidateStoreError, FetchError, FetchReport,
    SqliteCandidateStore, Venue, VenueCache, VenueCacheError, VenueSearch, VenueSearchClient,
    VenueSearchConfig, VenueSearchError, VenueSource, venues_to_records,
};

#[cfg(feature = "test-support")]
pub use siteline_core::test_support;
