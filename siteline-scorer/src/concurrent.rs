//! Bounded-concurrency proximity aggregation on Tokio.
//!
//! Candidates are scored on up to `workers` tasks at once. Each lookup runs
//! on the blocking pool under a timeout, so a stalled finder costs one
//! category's contribution rather than the whole run.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use siteline_core::{
    Candidate, Diagnostic, LookupError, NearestFinder, PolicyTable, Ranking, ScoredCandidate,
};
use tokio_util::sync::CancellationToken;

use crate::error::ScoreError;
use crate::options::{CancelMode, ScoringOptions};
use crate::tally::{Tally, resolve_location};

#[derive(Debug)]
enum Outcome {
    Scored(ScoredCandidate, Vec<Diagnostic>),
    Invalid(Diagnostic),
    Cancelled,
}

/// Concurrent form of [`score_candidates`](crate::score_candidates).
///
/// Produces the same ranking as the sequential form for the same inputs:
/// results are restored to input order before the stable score sort, so
/// concurrency never changes tie order.
///
/// Each lookup is bounded by [`ScoringOptions::lookup_timeout`]; an elapsed
/// bound contributes zero and is reported as a `LookupTimeout` diagnostic.
/// The cancellation token is checked before every lookup. Once it fires no
/// new lookups start, lookups already running are awaited, and the
/// candidates they belong to are dropped.
///
/// # Errors
/// Returns [`ScoreError::Cancelled`] when the run was cancelled under
/// [`CancelMode::Discard`], and [`ScoreError::Join`] when a scoring task
/// panicked. Under [`CancelMode::Truncate`] a cancelled run returns the
/// finished candidates with [`Ranking::truncated`] set.
pub async fn score_candidates_concurrently<F>(
    candidates: Vec<Candidate>,
    policies: Arc<PolicyTable>,
    finder: Arc<F>,
    options: &ScoringOptions,
) -> Result<Ranking, ScoreError>
where
    F: NearestFinder + ?Sized + 'static,
{
    let total = candidates.len();
    let timeout = options.lookup_timeout();
    let token = options.cancellation().clone();

    let results: Vec<_> = stream::iter(candidates.into_iter().enumerate())
        .map(|(index, candidate)| {
            let task = tokio::spawn(score_one(
                index,
                candidate,
                Arc::clone(&policies),
                Arc::clone(&finder),
                timeout,
                token.clone(),
            ));
            async move { (index, task.await) }
        })
        .buffer_unordered(options.workers().get())
        .collect()
        .await;

    let mut outcomes = Vec::with_capacity(total);
    for (index, joined) in results {
        let outcome = joined.map_err(|source| ScoreError::Join {
            candidate_index: index,
            source,
        })?;
        outcomes.push((index, outcome));
    }
    outcomes.sort_by_key(|(index, _)| *index);
    assemble(outcomes, total, options.cancel_mode())
}

fn assemble(
    outcomes: Vec<(usize, Outcome)>,
    total: usize,
    mode: CancelMode,
) -> Result<Ranking, ScoreError> {
    let mut scored = Vec::with_capacity(outcomes.len());
    let mut diagnostics = Vec::new();
    let mut cancelled = 0_usize;

    for (_, outcome) in outcomes {
        match outcome {
            Outcome::Scored(entry, found) => {
                scored.push(entry);
                diagnostics.extend(found);
            }
            Outcome::Invalid(diagnostic) => diagnostics.push(diagnostic),
            Outcome::Cancelled => cancelled += 1,
        }
    }

    if cancelled == 0 {
        return Ok(Ranking::from_scored(scored, diagnostics, false));
    }
    let completed = total.saturating_sub(cancelled);
    log::warn!("scoring cancelled with {completed} of {total} candidates finished");
    match mode {
        CancelMode::Discard => Err(ScoreError::Cancelled { completed, total }),
        CancelMode::Truncate => Ok(Ranking::from_scored(scored, diagnostics, true)),
    }
}

async fn score_one<F>(
    index: usize,
    candidate: Candidate,
    policies: Arc<PolicyTable>,
    finder: Arc<F>,
    timeout: Duration,
    token: CancellationToken,
) -> Outcome
where
    F: NearestFinder + ?Sized + 'static,
{
    if token.is_cancelled() {
        return Outcome::Cancelled;
    }
    let point = match resolve_location(index, &candidate) {
        Ok(point) => point,
        Err(diagnostic) => return Outcome::Invalid(diagnostic),
    };
    let mut tally = Tally::new(index, candidate.name, point);
    for (category, policy) in policies.iter() {
        if token.is_cancelled() {
            log::debug!("candidate #{index}: cancelled before {category} lookup");
            return Outcome::Cancelled;
        }
        let shared = Arc::clone(&finder);
        let lookup = tokio::task::spawn_blocking(move || shared.nearest(category, point));
        let outcome = match tokio::time::timeout(timeout, lookup).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(LookupError::backend(format!("lookup task failed: {join}"))),
            Err(_) => Err(LookupError::Timeout { timeout }),
        };
        tally.record(category, policy, outcome);
    }
    if token.is_cancelled() {
        log::debug!("candidate #{index}: cancelled during its final lookup");
        return Outcome::Cancelled;
    }
    let (entry, diagnostics) = tally.finish();
    Outcome::Scored(entry, diagnostics)
}
