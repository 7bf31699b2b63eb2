//! Validated WGS84 positions.

use geo::{Coord, Point};
use thiserror::Error;

/// A validated geographic position.
///
/// Coordinates are WGS84 degrees with `x = longitude` and `y = latitude`,
/// matching the axis order used by [`geo::Coord`]. Construction rejects
/// non-finite values and values outside the valid ranges, so every
/// `GeoPoint` is safe to feed to the distance model.
///
/// # Examples
/// ```
/// use siteline_core::GeoPoint;
///
/// # fn main() -> Result<(), siteline_core::GeoPointError> {
/// let ferry_building = GeoPoint::new(-122.3937, 37.7955)?;
/// assert_eq!(ferry_building.longitude(), -122.3937);
/// assert!(GeoPoint::new(-122.3937, 97.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawGeoPoint", into = "RawGeoPoint")
)]
pub struct GeoPoint(Coord<f64>);

/// Errors returned by [`GeoPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoPointError {
    /// Either coordinate was NaN or infinite.
    #[error("coordinates must be finite (longitude {longitude}, latitude {latitude})")]
    NonFinite {
        /// Longitude as supplied.
        longitude: f64,
        /// Latitude as supplied.
        latitude: f64,
    },
    /// Longitude fell outside `-180.0..=180.0`.
    #[error("longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),
    /// Latitude fell outside `-90.0..=90.0`.
    #[error("latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),
}

impl GeoPoint {
    /// Validate and construct a point from longitude and latitude degrees.
    ///
    /// # Errors
    /// Returns [`GeoPointError`] when either value is non-finite or out of
    /// range.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoPointError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(GeoPointError::NonFinite {
                longitude,
                latitude,
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoPointError::LongitudeOutOfRange(longitude));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoPointError::LatitudeOutOfRange(latitude));
        }
        Ok(Self(Coord {
            x: longitude,
            y: latitude,
        }))
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.0.x
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.0.y
    }

    /// The underlying coordinate.
    #[must_use]
    pub const fn coord(self) -> Coord<f64> {
        self.0
    }

    /// The position as a [`geo::Point`], as expected by `geo` metric spaces.
    #[must_use]
    pub fn to_point(self) -> Point<f64> {
        Point::from(self.0)
    }
}

impl TryFrom<Coord<f64>> for GeoPoint {
    type Error = GeoPointError;

    fn try_from(coord: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(coord.x, coord.y)
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        point.0
    }
}

/// Wire form of [`GeoPoint`]; validated on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawGeoPoint {
    longitude: f64,
    latitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = GeoPointError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::new(raw.longitude, raw.latitude)
    }
}

#[cfg(feature = "serde")]
impl From<GeoPoint> for RawGeoPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            longitude: point.longitude(),
            latitude: point.latitude(),
        }
    }
}
