//! Proximity aggregation for Siteline candidates.
//!
//! The crate turns candidate office locations into a ranking. For every
//! candidate it asks a [`NearestFinder`](siteline_core::NearestFinder) for
//! the closest venue of each category in a
//! [`PolicyTable`](siteline_core::PolicyTable), decays the distance with
//! [`normalized_score`](siteline_core::normalized_score), weights it, and
//! sums across categories.
//!
//! Two entry points share the per-candidate routine:
//! - [`score_candidates`] runs sequentially and cannot fail once a validated
//!   policy table exists.
//! - [`score_candidates_concurrently`] scores on Tokio with a bounded worker
//!   count, per-lookup timeouts and cooperative cancellation.
//!
//! Both return a [`Ranking`](siteline_core::Ranking) whose diagnostics list
//! every contained failure.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregate;
mod concurrent;
mod error;
mod options;
mod tally;

pub use aggregate::score_candidates;
pub use concurrent::score_candidates_concurrently;
pub use error::ScoreError;
pub use options::{CancelMode, DEFAULT_LOOKUP_TIMEOUT, ScoringOptions};
