use crate::{GeoPoint, PoiCategory};

/// A known venue of one category.
///
/// Records are produced by the POI source and consulted by nearest-neighbour
/// lookups; at most one record per category is used when scoring a candidate.
///
/// # Examples
/// ```
/// use siteline_core::{GeoPoint, PoiCategory, PoiRecord};
///
/// # fn main() -> Result<(), siteline_core::GeoPointError> {
/// let poi = PoiRecord::new("Blue Bottle", PoiCategory::Starbucks, GeoPoint::new(-122.4, 37.78)?);
/// assert_eq!(poi.category, PoiCategory::Starbucks);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoiRecord {
    /// Display name reported by the source.
    pub name: String,
    /// Category the venue was found under.
    pub category: PoiCategory,
    /// Venue position.
    pub location: GeoPoint,
}

impl PoiRecord {
    /// Construct a record.
    #[must_use]
    pub fn new(name: impl Into<String>, category: PoiCategory, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            category,
            location,
        }
    }
}
