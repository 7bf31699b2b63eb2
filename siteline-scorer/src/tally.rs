//! Per-candidate accumulation shared by the sequential and concurrent
//! aggregators.

use siteline_core::{
    Candidate, CategoryPolicy, Diagnostic, DiagnosticKind, GeoPoint, LookupError, PoiCategory,
    PoiRecord, ScoredCandidate, distance_meters, normalized_score, round_score,
};

/// Validate a candidate's raw location.
///
/// A missing or out-of-range position becomes an `InvalidCandidate`
/// diagnostic and the candidate takes no further part in scoring.
pub(crate) fn resolve_location(index: usize, candidate: &Candidate) -> Result<GeoPoint, Diagnostic> {
    let Some(coord) = candidate.location else {
        log::warn!("candidate #{index} '{}' has no location", candidate.name);
        return Err(Diagnostic::invalid_candidate(
            candidate.name.clone(),
            index,
            "missing location",
        ));
    };
    GeoPoint::try_from(coord).map_err(|err| {
        log::warn!("candidate #{index} '{}' rejected: {err}", candidate.name);
        Diagnostic::invalid_candidate(candidate.name.clone(), index, err.to_string())
    })
}

/// Running weighted sum for one candidate.
#[derive(Debug)]
pub(crate) struct Tally {
    index: usize,
    name: String,
    point: GeoPoint,
    raw: f64,
    diagnostics: Vec<Diagnostic>,
}

impl Tally {
    pub(crate) const fn new(index: usize, name: String, point: GeoPoint) -> Self {
        Self {
            index,
            name,
            point,
            raw: 0.0,
            diagnostics: Vec::new(),
        }
    }

    /// Fold one lookup outcome into the sum.
    ///
    /// Absent venues and failed lookups both contribute zero; only failures
    /// leave a diagnostic behind.
    #[expect(clippy::float_arithmetic, reason = "weighted sum of scores")]
    pub(crate) fn record(
        &mut self,
        category: PoiCategory,
        policy: &CategoryPolicy,
        outcome: Result<Option<PoiRecord>, LookupError>,
    ) {
        match outcome {
            Ok(Some(poi)) => {
                let distance = distance_meters(self.point, poi.location);
                let contribution =
                    normalized_score(distance, policy.max_distance_meters) * policy.weight;
                log::trace!(
                    "candidate #{} {category}: '{}' at {distance:.1} m adds {contribution:.4}",
                    self.index,
                    poi.name
                );
                self.raw += contribution;
            }
            Ok(None) => {
                log::debug!("candidate #{} {category}: no venue known", self.index);
            }
            Err(LookupError::Timeout { timeout }) => {
                log::warn!(
                    "candidate #{} '{}' {category}: lookup timed out after {timeout:?}",
                    self.index,
                    self.name
                );
                self.push(category, DiagnosticKind::LookupTimeout { timeout });
            }
            Err(err) => {
                log::warn!(
                    "candidate #{} '{}' {category}: {err}",
                    self.index,
                    self.name
                );
                self.push(
                    category,
                    DiagnosticKind::LookupFailure {
                        message: err.to_string(),
                    },
                );
            }
        }
    }

    fn push(&mut self, category: PoiCategory, kind: DiagnosticKind) {
        self.diagnostics
            .push(Diagnostic::lookup(self.name.clone(), self.index, category, kind));
    }

    /// Round the sum and hand back the result with its diagnostics.
    pub(crate) fn finish(self) -> (ScoredCandidate, Vec<Diagnostic>) {
        let score = round_score(self.raw);
        log::debug!(
            "candidate #{} '{}' scored {score} (raw {})",
            self.index,
            self.name,
            self.raw
        );
        let scored = ScoredCandidate {
            name: self.name,
            location: self.point,
            score,
            raw_score: self.raw,
        };
        (scored, self.diagnostics)
    }
}
