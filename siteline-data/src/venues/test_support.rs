//! Test utilities for venue fetching.
//!
//! [`StubSearch`] answers from pre-configured venue lists without touching
//! the network and records every category it was asked for.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;

use async_trait::async_trait;
use siteline_core::PoiCategory;

use super::{Venue, VenueSearch, VenueSearchError};

/// Stub [`VenueSearch`] backed by in-memory responses.
///
/// Categories without a configured response return an empty list.
///
/// # Example
///
/// ```
/// use siteline_core::PoiCategory;
/// use siteline_data::venues::test_support::{StubSearch, block_on_for_tests};
/// use siteline_data::{Venue, VenueSearch};
///
/// let zeitgeist = Venue::new("Zeitgeist", 37.77, -122.42);
/// let stub = StubSearch::new().with_venues(PoiCategory::Bar, vec![zeitgeist]);
/// let venues = block_on_for_tests(stub.search(PoiCategory::Bar)).expect("stubbed search");
/// assert_eq!(venues.len(), 1);
/// assert_eq!(stub.calls(), [PoiCategory::Bar]);
/// ```
#[derive(Debug, Default)]
pub struct StubSearch {
    responses: BTreeMap<PoiCategory, StubResponse>,
    calls: RefCell<Vec<PoiCategory>>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Venues(Vec<Venue>),
    Status(u16),
}

impl StubSearch {
    /// Create a stub that returns no venues for any category.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `venues` for `category`.
    #[must_use]
    pub fn with_venues(mut self, category: PoiCategory, venues: Vec<Venue>) -> Self {
        self.responses.insert(category, StubResponse::Venues(venues));
        self
    }

    /// Fail searches for `category` with HTTP `status`.
    #[must_use]
    pub fn with_failure(mut self, category: PoiCategory, status: u16) -> Self {
        self.responses.insert(category, StubResponse::Status(status));
        self
    }

    /// Categories searched so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<PoiCategory> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl VenueSearch for StubSearch {
    async fn search(&self, category: PoiCategory) -> Result<Vec<Venue>, VenueSearchError> {
        self.calls.borrow_mut().push(category);
        match self.responses.get(&category) {
            Some(StubResponse::Venues(venues)) => Ok(venues.clone()),
            Some(StubResponse::Status(status)) => Err(VenueSearchError::Http {
                url: format!("stub://venues?query={category}"),
                status: *status,
                message: "stubbed failure".to_owned(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// # Panics
/// Panics when the runtime cannot be built.
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime.block_on(future),
        Err(err) => panic!("failed to build Tokio runtime: {err}"),
    }
}
