//! Venue categories that contribute to a candidate's proximity score.
//!
//! The enum is closed: every category the engine knows about is listed
//! here, and lookups are keyed by variant rather than by free-form strings.
//!
//! # Examples
//! ```
//! use siteline_core::PoiCategory;
//!
//! assert_eq!(PoiCategory::NightClub.as_str(), "night club");
//! assert_eq!("train_station".parse::<PoiCategory>(), Ok(PoiCategory::TrainStation));
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A semantically distinct class of venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "&'static str")
)]
pub enum PoiCategory {
    /// Design meetups and talks.
    DesignTalks,
    /// Bars.
    Bar,
    /// Night clubs.
    NightClub,
    /// Airports.
    Airport,
    /// Train stations.
    TrainStation,
    /// Ferry terminals.
    Ferry,
    /// Vegan restaurants.
    VeganRestaurant,
    /// Basketball stadiums.
    BasketballStadium,
    /// Pet grooming salons.
    PetGrooming,
    /// Schools.
    School,
    /// Starbucks coffee shops.
    Starbucks,
}

/// Error returned when a tag does not name a known [`PoiCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown POI category '{tag}'")]
pub struct UnknownCategory {
    /// The tag that failed to parse.
    pub tag: String,
}

impl PoiCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::DesignTalks,
        Self::Bar,
        Self::NightClub,
        Self::Airport,
        Self::TrainStation,
        Self::Ferry,
        Self::VeganRestaurant,
        Self::BasketballStadium,
        Self::PetGrooming,
        Self::School,
        Self::Starbucks,
    ];

    /// Return the category's canonical tag.
    ///
    /// The tag doubles as the venue search query and the cache key.
    ///
    /// # Examples
    /// ```
    /// use siteline_core::PoiCategory;
    ///
    /// assert_eq!(PoiCategory::VeganRestaurant.as_str(), "vegan restaurant");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DesignTalks => "design talks",
            Self::Bar => "bar",
            Self::NightClub => "night club",
            Self::Airport => "airport",
            Self::TrainStation => "train station",
            Self::Ferry => "ferry",
            Self::VeganRestaurant => "vegan restaurant",
            Self::BasketballStadium => "basketball stadium",
            Self::PetGrooming => "pet grooming",
            Self::School => "school",
            Self::Starbucks => "starbucks",
        }
    }
}

impl fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PoiCategory> for &'static str {
    fn from(category: PoiCategory) -> Self {
        category.as_str()
    }
}

impl FromStr for PoiCategory {
    type Err = UnknownCategory;

    /// Parse a tag case-insensitively; `_` and `-` stand in for spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalised)
            .ok_or_else(|| UnknownCategory { tag: s.to_owned() })
    }
}

impl TryFrom<String> for PoiCategory {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn display_matches_as_str() {
        assert_eq!(PoiCategory::Ferry.to_string(), PoiCategory::Ferry.as_str());
    }

    #[rstest]
    fn every_tag_round_trips() {
        for category in PoiCategory::ALL {
            assert_eq!(category.as_str().parse::<PoiCategory>(), Ok(category));
        }
    }

    #[rstest]
    #[case("Design Talks", PoiCategory::DesignTalks)]
    #[case("pet-grooming", PoiCategory::PetGrooming)]
    #[case("basketball_stadium", PoiCategory::BasketballStadium)]
    #[case("  STARBUCKS ", PoiCategory::Starbucks)]
    fn parsing_is_lenient(#[case] tag: &str, #[case] expected: PoiCategory) {
        assert_eq!(tag.parse::<PoiCategory>(), Ok(expected));
    }

    #[rstest]
    fn parsing_rejects_unknown() {
        let err = "casino".parse::<PoiCategory>().unwrap_err();
        assert_eq!(err.tag, "casino");
        assert!(err.to_string().contains("unknown POI category"));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_as_tag() {
        let json = serde_json::to_string(&PoiCategory::TrainStation).expect("serialise");
        assert_eq!(json, "\"train station\"");
        let parsed: PoiCategory = serde_json::from_str("\"night_club\"").expect("deserialise");
        assert_eq!(parsed, PoiCategory::NightClub);
    }
}
