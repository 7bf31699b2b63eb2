//! Tuning knobs for the concurrent aggregator.

use std::num::NonZeroUsize;
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Default bound on a single nearest-neighbour lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// What a cancelled run returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelMode {
    /// Drop partial results and fail with
    /// [`ScoreError::Cancelled`](crate::ScoreError::Cancelled).
    #[default]
    Discard,
    /// Return the candidates finished before cancellation as a ranking
    /// flagged `truncated`.
    Truncate,
}

/// Options for [`crate::score_candidates_concurrently`].
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use std::time::Duration;
/// use siteline_scorer::{CancelMode, ScoringOptions};
///
/// let options = ScoringOptions::default()
///     .with_workers(NonZeroUsize::new(4).expect("non-zero"))
///     .with_lookup_timeout(Duration::from_millis(250))
///     .with_cancel_mode(CancelMode::Truncate);
/// assert_eq!(options.workers().get(), 4);
/// assert_eq!(options.cancel_mode(), CancelMode::Truncate);
/// ```
#[derive(Debug, Clone)]
pub struct ScoringOptions {
    workers: NonZeroUsize,
    lookup_timeout: Duration,
    cancellation: CancellationToken,
    cancel_mode: CancelMode,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            cancellation: CancellationToken::new(),
            cancel_mode: CancelMode::default(),
        }
    }
}

impl ScoringOptions {
    /// Bound the number of candidates scored at once.
    #[must_use]
    pub const fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = workers;
        self
    }

    /// Bound each nearest-neighbour lookup.
    #[must_use]
    pub const fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Use `token` to stop the run early.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Choose what a cancelled run returns.
    #[must_use]
    pub const fn with_cancel_mode(mut self, mode: CancelMode) -> Self {
        self.cancel_mode = mode;
        self
    }

    /// Maximum number of candidates in flight.
    #[must_use]
    pub const fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Bound on each lookup.
    #[must_use]
    pub const fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout
    }

    /// Token observed between lookups.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Behaviour on cancellation.
    #[must_use]
    pub const fn cancel_mode(&self) -> CancelMode {
        self.cancel_mode
    }
}
