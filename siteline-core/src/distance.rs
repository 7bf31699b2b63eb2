//! Distance model: geodesic distance and square-root distance decay.
//!
//! Both functions are pure leaves the aggregator calls once per
//! (candidate, category) pair.

use geo::{Distance, Geodesic};

use crate::GeoPoint;

/// Decimal places kept by [`round_score`].
pub const SCORE_DECIMALS: usize = 2;

/// Geodesic distance in meters between two points on the WGS84 ellipsoid.
///
/// The result is symmetric, exactly `0.0` for identical points and finite for
/// antipodal points.
///
/// # Examples
/// ```
/// use siteline_core::{GeoPoint, distance_meters};
///
/// # fn main() -> Result<(), siteline_core::GeoPointError> {
/// let a = GeoPoint::new(0.0, 0.0)?;
/// let b = GeoPoint::new(0.0, 1.0)?;
/// let d = distance_meters(a, b);
/// assert!((d - 110_574.4).abs() < 1.0);
/// assert_eq!(distance_meters(a, a), 0.0);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    if a == b {
        return 0.0;
    }
    Geodesic.distance(a.to_point(), b.to_point())
}

/// Map a distance onto `0.0..=1.0` with a square-root decay.
///
/// Returns `sqrt(1 - (distance / max_distance)^2)` for distances within
/// `max_distance` and `0.0` beyond it. Negative distances count as zero; a
/// NaN distance scores `0.0`.
///
/// # Panics
/// Panics when `max_distance` is not strictly positive and finite. Policy
/// tables reject such values, so reaching this is a programming error.
///
/// # Examples
/// ```
/// use siteline_core::normalized_score;
///
/// assert_eq!(normalized_score(0.0, 3000.0), 1.0);
/// assert_eq!(normalized_score(3000.0, 3000.0), 0.0);
/// assert_eq!(normalized_score(3001.0, 3000.0), 0.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "distance decay is floating-point")]
pub fn normalized_score(distance: f64, max_distance: f64) -> f64 {
    assert!(
        max_distance.is_finite() && max_distance > 0.0,
        "max_distance must be positive and finite, got {max_distance}"
    );
    if distance.is_nan() || distance > max_distance {
        return 0.0;
    }
    let ratio = distance.max(0.0) / max_distance;
    (1.0 - ratio * ratio).max(0.0).sqrt()
}

/// Round a raw score to [`SCORE_DECIMALS`] places.
///
/// Rounding works on the exact binary value of `raw`, so only values that are
/// exactly halfway round to even, e.g. `0.125` becomes `0.12`.
///
/// # Examples
/// ```
/// use siteline_core::round_score;
///
/// assert_eq!(round_score(0.104_9), 0.1);
/// assert_eq!(round_score(0.105_1), 0.11);
/// assert_eq!(round_score(0.125), 0.12);
/// ```
#[must_use]
pub fn round_score(raw: f64) -> f64 {
    format!("{raw:.precision$}", precision = SCORE_DECIMALS)
        .parse()
        .unwrap_or(raw)
}
