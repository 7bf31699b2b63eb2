//! Venue search, caching and conversion into POI records.
//!
//! [`VenueSource`] fetches each category once: a cached JSON file wins over
//! the API, and fresh API results are written back to the cache. The
//! resulting venues feed [`venues_to_records`], whose output builds a
//! [`PoiIndex`](siteline_core::PoiIndex).

mod cache;
mod client;
mod model;
mod source;
pub mod test_support;

use siteline_core::{GeoPoint, PoiCategory, PoiRecord};

pub use cache::{VenueCache, VenueCacheError};
pub use client::{
    DEFAULT_BASE_URL, DEFAULT_LIMIT, DEFAULT_USER_AGENT, VenueSearch, VenueSearchClient,
    VenueSearchConfig, VenueSearchError,
};
pub use model::{Geocodes, LatLng, Venue};
pub use source::{
    CategoryFetch, DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_INTERVAL, FetchError, FetchFailure, FetchReport, VenueSource,
};

/// Name given to venues the API returns without one.
pub const UNKNOWN_NAME: &str = "Unknown Name";

/// Convert venues into POI records for `category`.
///
/// Venues without a main geocode, or whose coordinates are out of range, are
/// skipped.
///
/// # Examples
/// ```
/// use siteline_core::PoiCategory;
/// use siteline_data::{Venue, venues_to_records};
///
/// let records = venues_to_records(PoiCategory::Ferry, &[
///     Venue::new("Ferry Building", 37.7955, -122.3937),
///     Venue::default(),
/// ]);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].name, "Ferry Building");
/// ```
#[must_use]
pub fn venues_to_records(category: PoiCategory, venues: &[Venue]) -> Vec<PoiRecord> {
    venues
        .iter()
        .filter_map(|venue| to_record(category, venue))
        .collect()
}

fn to_record(category: PoiCategory, venue: &Venue) -> Option<PoiRecord> {
    let name = venue.name.as_deref().unwrap_or(UNKNOWN_NAME);
    let Some((latitude, longitude)) = venue.main_lat_lng() else {
        log::debug!("skipping {category} venue '{name}' without a main geocode");
        return None;
    };
    match GeoPoint::new(longitude, latitude) {
        Ok(location) => Some(PoiRecord::new(name, category, location)),
        Err(err) => {
            log::debug!("skipping {category} venue '{name}': {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unnamed_venues_get_a_placeholder() {
        let venue = Venue {
            name: None,
            ..Venue::new("ignored", 37.79, -122.39)
        };
        let records = venues_to_records(PoiCategory::Ferry, &[venue]);
        let names: Vec<_> = records.iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, [UNKNOWN_NAME]);
    }

    #[rstest]
    #[case(91.0, 0.0)]
    #[case(0.0, 181.0)]
    #[case(f64::NAN, 0.0)]
    fn invalid_coordinates_are_skipped(#[case] latitude: f64, #[case] longitude: f64) {
        let venue = Venue::new("Nowhere", latitude, longitude);
        assert!(venues_to_records(PoiCategory::Bar, &[venue]).is_empty());
    }

    #[rstest]
    fn records_take_the_requested_category() {
        let records = venues_to_records(
            PoiCategory::Airport,
            &[Venue::new("SFO", 37.6213, -122.379)],
        );
        let record = records.first().expect("one record");
        assert_eq!(record.category, PoiCategory::Airport);
        assert_eq!(record.location.latitude(), 37.6213);
        assert_eq!(record.location.longitude(), -122.379);
    }
}
