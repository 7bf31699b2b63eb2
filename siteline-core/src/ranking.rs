//! Scoring output: ranked candidates plus a diagnostics channel.
//!
//! Contained failures never abort a run. They surface here instead, next to
//! the ranked list, so callers can judge whether degraded results are good
//! enough.

use std::fmt;
use std::time::Duration;

use crate::{GeoPoint, PoiCategory};

/// A candidate that was scored successfully.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredCandidate {
    /// Candidate name as supplied.
    pub name: String,
    /// Validated candidate position.
    pub location: GeoPoint,
    /// Composite score rounded to [`SCORE_DECIMALS`](crate::SCORE_DECIMALS)
    /// places. Rankings sort on this value.
    pub score: f64,
    /// Unrounded weighted sum.
    pub raw_score: f64,
}

/// What went wrong for one candidate or one (candidate, category) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum DiagnosticKind {
    /// The candidate had no usable location and was left out of the ranking.
    InvalidCandidate {
        /// Why the location was rejected.
        reason: String,
    },
    /// The nearest-neighbour lookup did not answer in time. The category
    /// contributed zero.
    LookupTimeout {
        /// Bound that elapsed.
        #[cfg_attr(feature = "serde", serde(with = "duration_millis"))]
        timeout: Duration,
    },
    /// The nearest-neighbour lookup failed. The category contributed zero.
    LookupFailure {
        /// Collaborator error message.
        message: String,
    },
}

/// A contained failure, tagged with the candidate it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// Name of the affected candidate.
    pub candidate: String,
    /// Position of the candidate in the input sequence.
    pub candidate_index: usize,
    /// Category of the failed lookup; `None` for candidate-level problems.
    pub category: Option<PoiCategory>,
    /// Failure details.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Build a candidate-level diagnostic.
    #[must_use]
    pub fn invalid_candidate(
        candidate: impl Into<String>,
        candidate_index: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            candidate: candidate.into(),
            candidate_index,
            category: None,
            kind: DiagnosticKind::InvalidCandidate {
                reason: reason.into(),
            },
        }
    }

    /// Build a per-category diagnostic.
    #[must_use]
    pub fn lookup(
        candidate: impl Into<String>,
        candidate_index: usize,
        category: PoiCategory,
        kind: DiagnosticKind,
    ) -> Self {
        Self {
            candidate: candidate.into(),
            candidate_index,
            category: Some(category),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "candidate #{} '{}'", self.candidate_index, self.candidate)?;
        if let Some(category) = self.category {
            write!(f, " [{category}]")?;
        }
        match &self.kind {
            DiagnosticKind::InvalidCandidate { reason } => write!(f, ": invalid candidate: {reason}"),
            DiagnosticKind::LookupTimeout { timeout } => {
                write!(f, ": lookup timed out after {timeout:?}")
            }
            DiagnosticKind::LookupFailure { message } => write!(f, ": lookup failed: {message}"),
        }
    }
}

/// Candidates sorted by descending score, with every contained failure.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ranking {
    /// Scored candidates, best first. Exact ties keep input order.
    pub ranked: Vec<ScoredCandidate>,
    /// Contained failures in input order.
    pub diagnostics: Vec<Diagnostic>,
    /// Set when scoring stopped early and `ranked` holds only the candidates
    /// finished before cancellation.
    pub truncated: bool,
}

impl Ranking {
    /// Sort `scored` into ranking order and assemble the result.
    ///
    /// `scored` must be in input order: the sort is stable, so ties keep the
    /// order they arrive in.
    ///
    /// # Examples
    /// ```
    /// use siteline_core::{GeoPoint, Ranking, ScoredCandidate};
    ///
    /// # fn main() -> Result<(), siteline_core::GeoPointError> {
    /// let at = GeoPoint::new(0.0, 0.0)?;
    /// let entry = |name: &str, score| ScoredCandidate {
    ///     name: name.into(),
    ///     location: at,
    ///     score,
    ///     raw_score: score,
    /// };
    /// let ranking = Ranking::from_scored(
    ///     vec![entry("a", 0.42), entry("b", 0.81), entry("c", 0.81)],
    ///     Vec::new(),
    ///     false,
    /// );
    /// let names: Vec<_> = ranking.ranked.iter().map(|c| c.name.as_str()).collect();
    /// assert_eq!(names, ["b", "c", "a"]);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn from_scored(
        mut scored: Vec<ScoredCandidate>,
        diagnostics: Vec<Diagnostic>,
        truncated: bool,
    ) -> Self {
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self {
            ranked: scored,
            diagnostics,
            truncated,
        }
    }

    /// Report whether any failure was contained during the run.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.truncated || !self.diagnostics.is_empty()
    }
}

#[cfg(feature = "serde")]
mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
