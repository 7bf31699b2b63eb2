//! Core domain types for the Siteline office-scouting engine.
//!
//! The crate holds the distance model (geodesic distance and square-root
//! distance decay), validated inputs for scoring, the nearest-neighbour
//! collaborator trait and an in-memory R\*-tree implementation of it.
//! Constructors return `Result` to surface invalid input early; aggregation
//! over candidates lives in `siteline-scorer`.
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod candidate;
mod category;
mod distance;
mod index;
pub mod nearest;
mod poi;
mod point;
mod policy;
mod ranking;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use candidate::Candidate;
pub use category::{PoiCategory, UnknownCategory};
pub use distance::{SCORE_DECIMALS, distance_meters, normalized_score, round_score};
pub use index::PoiIndex;
pub use nearest::{LookupError, NearestFinder};
pub use poi::PoiRecord;
pub use point::{GeoPoint, GeoPointError};
pub use policy::{CategoryPolicy, PolicyError, PolicyTable};
pub use ranking::{Diagnostic, DiagnosticKind, Ranking, ScoredCandidate};
