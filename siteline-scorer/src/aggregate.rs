//! Sequential proximity aggregation.

use siteline_core::{Candidate, NearestFinder, PolicyTable, Ranking};

use crate::tally::{Tally, resolve_location};

/// Score every candidate against every policy and rank the results.
///
/// For each candidate and each configured category the finder supplies the
/// nearest venue; its decayed distance score times the category weight is
/// added to the candidate's total. Totals are rounded to
/// [`SCORE_DECIMALS`](siteline_core::SCORE_DECIMALS) places and sorted
/// descending with a stable sort, so exact ties keep input order.
///
/// Nothing here fails the batch. Candidates without a usable location are
/// left out of `ranked`; they and any failed lookup are reported in
/// [`Ranking::diagnostics`].
///
/// Lookups run inline on the calling thread with no time bound, so use this
/// only with finders that answer from memory and cannot block, such as
/// [`PoiIndex`](siteline_core::PoiIndex). Finders backed by a network or a
/// database belong in
/// [`score_candidates_concurrently`](crate::score_candidates_concurrently),
/// which bounds every lookup with a caller-supplied timeout.
///
/// # Examples
/// ```
/// use siteline_core::{
///     Candidate, CategoryPolicy, GeoPoint, LookupError, PoiCategory, PoiRecord, PolicyTable,
/// };
/// use siteline_scorer::score_candidates;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let here = GeoPoint::new(0.0, 0.0)?;
/// let policies = PolicyTable::new([(PoiCategory::School, CategoryPolicy::new(3000.0, 0.1))])?;
/// let finder = move |category: PoiCategory, _: GeoPoint| -> Result<Option<PoiRecord>, LookupError> {
///     Ok(Some(PoiRecord::new("Elm St", category, here)))
/// };
///
/// let ranking = score_candidates(&[Candidate::new("HQ", here)], &policies, &finder);
/// assert_eq!(ranking.ranked[0].score, 0.1);
/// assert!(ranking.diagnostics.is_empty());
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn score_candidates<F>(candidates: &[Candidate], policies: &PolicyTable, finder: &F) -> Ranking
where
    F: NearestFinder + ?Sized,
{
    let mut scored = Vec::with_capacity(candidates.len());
    let mut diagnostics = Vec::new();

    for (index, candidate) in candidates.iter().enumerate() {
        let point = match resolve_location(index, candidate) {
            Ok(point) => point,
            Err(diagnostic) => {
                diagnostics.push(diagnostic);
                continue;
            }
        };
        let mut tally = Tally::new(index, candidate.name.clone(), point);
        for (category, policy) in policies.iter() {
            tally.record(category, policy, finder.nearest(category, point));
        }
        let (entry, found) = tally.finish();
        scored.push(entry);
        diagnostics.extend(found);
    }

    log::debug!(
        "scored {} of {} candidates with {} diagnostics",
        scored.len(),
        candidates.len(),
        diagnostics.len()
    );
    Ranking::from_scored(scored, diagnostics, false)
}
