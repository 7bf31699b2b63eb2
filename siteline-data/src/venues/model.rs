//! Wire model for venue search results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A venue as returned by the search API.
///
/// Only the fields the engine reads are typed. Everything else is kept in
/// `extra` so cached files round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Venue {
    /// Display name, when the API supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Geocoded positions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocodes: Option<Geocodes>,
    /// Remaining fields, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Venue {
    /// Construct a venue with a name and main geocode.
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: Some(name.into()),
            geocodes: Some(Geocodes {
                main: Some(LatLng {
                    latitude: Some(latitude),
                    longitude: Some(longitude),
                }),
                extra: Map::new(),
            }),
            extra: Map::new(),
        }
    }

    /// Main geocode as `(latitude, longitude)` when both halves are present.
    #[must_use]
    pub fn main_lat_lng(&self) -> Option<(f64, f64)> {
        let main = self.geocodes.as_ref()?.main.as_ref()?;
        Some((main.latitude?, main.longitude?))
    }
}

/// Geocode block of a venue.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Geocodes {
    /// Primary position of the venue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<LatLng>,
    /// Other geocodes (entrances, drop-off points), untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Latitude and longitude pair in the API's field naming.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    /// Degrees north.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Degrees east.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) results: Vec<Venue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unknown_fields_survive_a_round_trip() {
        let raw = r#"{
            "fsq_id": "abc",
            "name": "Zeitgeist",
            "geocodes": {
                "main": { "latitude": 37.77, "longitude": -122.42 },
                "roof": { "latitude": 37.7701, "longitude": -122.4201 }
            },
            "distance": 120
        }"#;
        let venue: Venue = serde_json::from_str(raw).expect("decode venue");
        assert_eq!(venue.main_lat_lng(), Some((37.77, -122.42)));
        let encoded = serde_json::to_value(&venue).expect("encode venue");
        let original: Value = serde_json::from_str(raw).expect("decode value");
        assert_eq!(encoded, original);
    }

    #[rstest]
    #[case(r#"{"name": "No geocodes"}"#)]
    #[case(r#"{"geocodes": {}}"#)]
    #[case(r#"{"geocodes": {"main": {"latitude": 1.0}}}"#)]
    fn incomplete_geocodes_have_no_position(#[case] raw: &str) {
        let venue: Venue = serde_json::from_str(raw).expect("decode venue");
        assert!(venue.main_lat_lng().is_none());
    }

    #[rstest]
    fn response_without_results_is_empty() {
        let response: SearchResponse = serde_json::from_str("{}").expect("decode response");
        assert!(response.results.is_empty());
    }
}
