//! Errors raised by the concurrent aggregator.

use thiserror::Error;

/// Run-level failures of [`crate::score_candidates_concurrently`].
///
/// Per-candidate and per-category problems never surface here; they are
/// contained in [`Ranking::diagnostics`](siteline_core::Ranking).
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The run was cancelled and the caller asked for partial results to be
    /// discarded.
    #[error("scoring cancelled after {completed} of {total} candidates")]
    Cancelled {
        /// Candidates fully scored before cancellation took effect.
        completed: usize,
        /// Candidates submitted.
        total: usize,
    },
    /// A scoring task panicked or was aborted by the runtime.
    #[error("scoring task for candidate #{candidate_index} failed")]
    Join {
        /// Input position of the affected candidate.
        candidate_index: usize,
        /// Runtime error.
        #[source]
        source: tokio::task::JoinError,
    },
}
