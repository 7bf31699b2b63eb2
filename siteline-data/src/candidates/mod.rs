//! Candidate office retrieval.
//!
//! A [`CandidateSource`] answers a [`CandidateFilter`] with candidates in
//! source order. Records missing coordinates are still returned so the
//! aggregator can report them.

mod sqlite;

use siteline_core::Candidate;

pub use sqlite::{CandidateStoreError, SqliteCandidateStore, create_schema};

/// Store of candidate offices.
pub trait CandidateSource {
    /// Candidates matching `filter`, de-duplicated, in source order.
    ///
    /// # Errors
    /// Returns [`CandidateStoreError`] when the backing store cannot be read.
    fn candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>, CandidateStoreError>;
}

/// Selection criteria for candidate offices.
///
/// Unset criteria do not restrict the selection; an empty `category_codes`
/// admits every category.
///
/// # Examples
/// ```
/// use siteline_data::CandidateFilter;
///
/// let filter = CandidateFilter::new()
///     .with_city("San Francisco")
///     .with_employee_range(87, 150)
///     .with_category_code("games_video");
/// assert_eq!(filter, CandidateFilter::reference());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    /// Exact city name.
    pub city: Option<String>,
    /// Inclusive lower bound on head count.
    pub min_employees: Option<u32>,
    /// Inclusive upper bound on head count.
    pub max_employees: Option<u32>,
    /// Accepted industry codes.
    pub category_codes: Vec<String>,
    /// Keep only companies that raised strictly more than this.
    pub min_raised_amount: Option<u64>,
}

impl CandidateFilter {
    /// Filter admitting every office.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gaming studios in San Francisco with 87 to 150 employees.
    #[must_use]
    pub fn reference() -> Self {
        Self::new()
            .with_city("San Francisco")
            .with_employee_range(87, 150)
            .with_category_code("games_video")
    }

    /// Restrict to `city`.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Restrict head count to `min..=max`.
    #[must_use]
    pub const fn with_employee_range(mut self, min: u32, max: u32) -> Self {
        self.min_employees = Some(min);
        self.max_employees = Some(max);
        self
    }

    /// Restrict head count to at least `min`.
    #[must_use]
    pub const fn with_min_employees(mut self, min: u32) -> Self {
        self.min_employees = Some(min);
        self
    }

    /// Restrict head count to at most `max`.
    #[must_use]
    pub const fn with_max_employees(mut self, max: u32) -> Self {
        self.max_employees = Some(max);
        self
    }

    /// Accept `code` in addition to codes already listed.
    #[must_use]
    pub fn with_category_code(mut self, code: impl Into<String>) -> Self {
        self.category_codes.push(code.into());
        self
    }

    /// Keep only companies that raised more than `amount`.
    #[must_use]
    pub const fn with_min_raised_amount(mut self, amount: u64) -> Self {
        self.min_raised_amount = Some(amount);
        self
    }
}
