//! Cache-first venue fetching with a polite pause between API calls.

use std::time::Duration;

use siteline_core::{PoiCategory, PoiRecord};
use thiserror::Error;

use super::cache::{VenueCache, VenueCacheError};
use super::client::{VenueSearch, VenueSearchError};
use super::model::Venue;
use super::venues_to_records;

/// Default pause between consecutive venue API calls.
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_secs(2);

/// Default number of repeats after a transient search failure.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Why a category could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The venue API call failed.
    #[error(transparent)]
    Search(#[from] VenueSearchError),
    /// The cache could not be read or written.
    #[error(transparent)]
    Cache(#[from] VenueCacheError),
}

/// Venues obtained for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFetch {
    /// Category the venues belong to.
    pub category: PoiCategory,
    /// Venues as returned by the API.
    pub venues: Vec<Venue>,
    /// Whether the venues came from the cache rather than the API.
    pub from_cache: bool,
}

/// A category that could not be fetched.
#[derive(Debug)]
pub struct FetchFailure {
    /// Category that failed.
    pub category: PoiCategory,
    /// Cause of the failure.
    pub error: FetchError,
}

/// Outcome of [`VenueSource::fetch_all`].
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Categories fetched successfully, in request order.
    pub categories: Vec<CategoryFetch>,
    /// Categories that failed, in request order.
    pub failures: Vec<FetchFailure>,
}

impl FetchReport {
    /// Convert every fetched venue into a POI record.
    #[must_use]
    pub fn records(&self) -> Vec<PoiRecord> {
        self.categories
            .iter()
            .flat_map(|fetch| venues_to_records(fetch.category, &fetch.venues))
            .collect()
    }

    /// Report whether every requested category was fetched.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Venue fetcher that consults the cache before the API.
#[derive(Debug)]
pub struct VenueSource<S> {
    search: S,
    cache: VenueCache,
    request_interval: Duration,
    max_retries: u32,
}

impl<S: VenueSearch> VenueSource<S> {
    /// Combine a search backend with a cache.
    #[must_use]
    pub const fn new(search: S, cache: VenueCache) -> Self {
        Self {
            search,
            cache,
            request_interval: DEFAULT_REQUEST_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the pause between consecutive API calls.
    #[must_use]
    pub const fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }

    /// Set how often a transiently failing search is repeated.
    ///
    /// Repeats back off exponentially, starting at the request interval.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Search backend.
    #[must_use]
    pub const fn search(&self) -> &S {
        &self.search
    }

    /// Venue cache.
    #[must_use]
    pub const fn cache(&self) -> &VenueCache {
        &self.cache
    }

    /// Fetch venues for one category.
    ///
    /// A cache hit returns without contacting the API. A miss searches, stores
    /// the result and returns it.
    ///
    /// # Errors
    /// Fails when the cache is unreadable or corrupt, when the search fails,
    /// or when the result cannot be cached. A failed search leaves the cache
    /// untouched.
    pub async fn fetch_category(
        &self,
        category: PoiCategory,
    ) -> Result<CategoryFetch, FetchError> {
        if let Some(venues) = self.cache.load(category)? {
            return Ok(self.hit(category, venues));
        }
        self.fetch_and_store(category).await
    }

    /// Fetch venues for each category in turn.
    ///
    /// API calls are separated by the request interval; cache hits never
    /// wait. Failures are collected and the remaining categories still run.
    pub async fn fetch_all<I>(&self, categories: I) -> FetchReport
    where
        I: IntoIterator<Item = PoiCategory>,
    {
        let mut report = FetchReport::default();
        let mut contacted = false;
        for category in categories {
            let outcome = match self.cache.load(category) {
                Ok(Some(venues)) => Ok(self.hit(category, venues)),
                Ok(None) => {
                    if contacted {
                        tokio::time::sleep(self.request_interval).await;
                    }
                    contacted = true;
                    self.fetch_and_store(category).await
                }
                Err(err) => Err(FetchError::from(err)),
            };
            match outcome {
                Ok(fetch) => report.categories.push(fetch),
                Err(error) => {
                    log::warn!("failed to fetch venues for {category}: {error}");
                    report.failures.push(FetchFailure { category, error });
                }
            }
        }
        report
    }

    fn hit(&self, category: PoiCategory, venues: Vec<Venue>) -> CategoryFetch {
        log::info!(
            "using {} cached venues for {category} from {}",
            venues.len(),
            self.cache.path_for(category)
        );
        CategoryFetch {
            category,
            venues,
            from_cache: true,
        }
    }

    async fn fetch_and_store(&self, category: PoiCategory) -> Result<CategoryFetch, FetchError> {
        let venues = self.search_with_retries(category).await?;
        self.cache.store(category, &venues)?;
        log::info!("fetched {} venues for {category}", venues.len());
        Ok(CategoryFetch {
            category,
            venues,
            from_cache: false,
        })
    }

    async fn search_with_retries(
        &self,
        category: PoiCategory,
    ) -> Result<Vec<Venue>, VenueSearchError> {
        let mut attempt = 0_u32;
        loop {
            match self.search.search(category).await {
                Ok(venues) => return Ok(venues),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let delay = self
                        .request_interval
                        .saturating_mul(2_u32.saturating_pow(attempt));
                    attempt = attempt.saturating_add(1);
                    log::warn!(
                        "search for {category} failed ({err}); retry {attempt} of {} in {delay:?}",
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
