//! On-disk cache of venue search results, one JSON file per category.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use siteline_core::PoiCategory;
use thiserror::Error;

use super::model::Venue;

/// Errors raised while reading or writing cached venues.
#[derive(Debug, Error)]
pub enum VenueCacheError {
    /// The cache file exists but could not be read.
    #[error("failed to read venue cache {path}: {source}")]
    Read {
        /// Cache file location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The cache file is not a JSON array of venues.
    #[error("venue cache {path} is corrupt: {source}")]
    Decode {
        /// Cache file location.
        path: Utf8PathBuf,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Venues could not be encoded as JSON.
    #[error("failed to encode venues for {path}: {source}")]
    Encode {
        /// Cache file location.
        path: Utf8PathBuf,
        /// JSON encoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The cache file could not be written.
    #[error("failed to write venue cache {path}: {source}")]
    Write {
        /// Cache file location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Directory of cached search results.
///
/// # Examples
/// ```
/// use siteline_core::PoiCategory;
/// use siteline_data::VenueCache;
///
/// let cache = VenueCache::new("data");
/// assert_eq!(cache.path_for(PoiCategory::NightClub).as_str(), "data/night_club.json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueCache {
    dir: Utf8PathBuf,
}

impl VenueCache {
    /// Cache rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// File holding the venues for `category`.
    #[must_use]
    pub fn path_for(&self, category: PoiCategory) -> Utf8PathBuf {
        self.dir.join(format!("{}.json", category.as_str().replace(' ', "_")))
    }

    /// Load cached venues for `category`; `Ok(None)` when nothing is cached.
    ///
    /// # Errors
    /// Fails when the file cannot be read or does not decode.
    pub fn load(&self, category: PoiCategory) -> Result<Option<Vec<Venue>>, VenueCacheError> {
        let path = self.path_for(category);
        let Some(contents) = siteline_fs::read_optional(&path).map_err(|source| {
            VenueCacheError::Read {
                path: path.clone(),
                source,
            }
        })?
        else {
            return Ok(None);
        };
        let venues = serde_json::from_str(&contents)
            .map_err(|source| VenueCacheError::Decode { path, source })?;
        Ok(Some(venues))
    }

    /// Replace the cached venues for `category`.
    ///
    /// # Errors
    /// Fails when the venues cannot be encoded or the file cannot be written.
    pub fn store(&self, category: PoiCategory, venues: &[Venue]) -> Result<(), VenueCacheError> {
        let path = self.path_for(category);
        let encoded = serde_json::to_vec(venues).map_err(|source| VenueCacheError::Encode {
            path: path.clone(),
            source,
        })?;
        siteline_fs::write_atomic(&path, &encoded).map_err(|source| VenueCacheError::Write {
            path: path.clone(),
            source,
        })?;
        log::debug!("cached {} venues for {category} at {path}", venues.len());
        Ok(())
    }
}
