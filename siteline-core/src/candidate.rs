use geo::Coord;

use crate::GeoPoint;

/// An office location under consideration.
///
/// The location is carried as raw upstream data. Records with missing or
/// malformed coordinates still flow into scoring, where they are excluded
/// from the ranking and reported as diagnostics.
///
/// # Examples
/// ```
/// use siteline_core::{Candidate, GeoPoint};
///
/// # fn main() -> Result<(), siteline_core::GeoPointError> {
/// let located = Candidate::new("Acme Games", GeoPoint::new(-122.41, 37.78)?);
/// assert!(located.location.is_some());
/// assert!(Candidate::unlocated("Ghost Inc").location.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Human-readable name; not required to be unique.
    pub name: String,
    /// Position as reported upstream, `x = longitude`, `y = latitude`.
    pub location: Option<Coord<f64>>,
}

impl Candidate {
    /// Construct a candidate at a validated position.
    #[must_use]
    pub fn new(name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            location: Some(location.coord()),
        }
    }

    /// Construct a candidate whose record lacks coordinates.
    #[must_use]
    pub fn unlocated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
        }
    }

    /// Construct a candidate from raw, unvalidated coordinates.
    #[must_use]
    pub fn from_raw(name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            name: name.into(),
            location: Some(Coord {
                x: longitude,
                y: latitude,
            }),
        }
    }
}
