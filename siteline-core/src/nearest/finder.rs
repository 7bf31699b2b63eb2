//! Nearest-finder trait and its closure adapter.

use crate::{GeoPoint, PoiCategory, PoiRecord};

use super::error::LookupError;

/// Return the single nearest known venue of a category.
///
/// Implementations are read-only and shared across scoring workers, hence
/// `Send + Sync`. "Nearest" should follow the great-circle metric used by
/// [`distance_meters`](crate::distance_meters); implementations that
/// approximate it must document the error bound.
///
/// Closures with the matching signature implement the trait, which keeps ad
/// hoc finders short in tests and tooling.
///
/// # Examples
///
/// ```rust
/// use siteline_core::{GeoPoint, LookupError, NearestFinder, PoiCategory, PoiRecord};
///
/// let school = GeoPoint::new(0.0, 0.0)?;
/// let finder = move |category: PoiCategory, _at: GeoPoint| -> Result<Option<PoiRecord>, LookupError> {
///     Ok((category == PoiCategory::School).then(|| PoiRecord::new("Elm St", category, school)))
/// };
///
/// let here = GeoPoint::new(0.01, 0.0)?;
/// assert!(finder.nearest(PoiCategory::School, here)?.is_some());
/// assert!(finder.nearest(PoiCategory::Airport, here)?.is_none());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait NearestFinder: Send + Sync {
    /// Return the nearest record of `category` to `point`, or `None` when no
    /// record of that category exists.
    ///
    /// # Errors
    /// Returns [`LookupError`] when the lookup itself failed.
    fn nearest(
        &self,
        category: PoiCategory,
        point: GeoPoint,
    ) -> Result<Option<PoiRecord>, LookupError>;
}

impl<F> NearestFinder for F
where
    F: Fn(PoiCategory, GeoPoint) -> Result<Option<PoiRecord>, LookupError> + Send + Sync,
{
    fn nearest(
        &self,
        category: PoiCategory,
        point: GeoPoint,
    ) -> Result<Option<PoiRecord>, LookupError> {
        self(category, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::{FailingFinder, FixedFinder};

    fn origin() -> GeoPoint {
        GeoPoint::new(0.0, 0.0).expect("valid point")
    }

    #[rstest]
    fn fixed_finder_answers_only_known_categories() {
        let finder = FixedFinder::new([PoiRecord::new("Pier", PoiCategory::Ferry, origin())]);
        let hit = finder
            .nearest(PoiCategory::Ferry, origin())
            .expect("lookup succeeds");
        assert_eq!(hit.map(|poi| poi.name), Some("Pier".to_owned()));
        let miss = finder
            .nearest(PoiCategory::Bar, origin())
            .expect("lookup succeeds");
        assert!(miss.is_none());
    }

    #[rstest]
    fn failing_finder_reports_backend_error() {
        let finder = FailingFinder::new("index offline");
        let err = finder
            .nearest(PoiCategory::Bar, origin())
            .expect_err("lookup fails");
        assert_eq!(err, LookupError::backend("index offline"));
    }

    #[rstest]
    fn trait_objects_are_usable() {
        let finder: Box<dyn NearestFinder> = Box::new(
            |_: PoiCategory, _: GeoPoint| -> Result<Option<PoiRecord>, LookupError> {
                Err(LookupError::unavailable("down"))
            },
        );
        assert!(finder.nearest(PoiCategory::School, origin()).is_err());
    }
}
