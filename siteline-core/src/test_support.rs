//! Test-only `NearestFinder` implementations used by unit and behaviour
//! tests across the workspace.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crate::{GeoPoint, LookupError, NearestFinder, PoiCategory, PoiRecord};

/// Finder returning one fixed record per category, whatever the query point.
///
/// Categories without a record answer `Ok(None)`.
#[derive(Debug, Default, Clone)]
pub struct FixedFinder {
    records: HashMap<PoiCategory, PoiRecord>,
}

impl FixedFinder {
    /// Create a finder from records; later records replace earlier ones of
    /// the same category.
    #[must_use]
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PoiRecord>,
    {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.category, record))
                .collect(),
        }
    }
}

impl NearestFinder for FixedFinder {
    fn nearest(
        &self,
        category: PoiCategory,
        _point: GeoPoint,
    ) -> Result<Option<PoiRecord>, LookupError> {
        Ok(self.records.get(&category).cloned())
    }
}

/// Finder whose every lookup fails with [`LookupError::Backend`].
#[derive(Debug, Clone)]
pub struct FailingFinder {
    message: String,
}

impl FailingFinder {
    /// Create a finder failing with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl NearestFinder for FailingFinder {
    fn nearest(
        &self,
        _category: PoiCategory,
        _point: GeoPoint,
    ) -> Result<Option<PoiRecord>, LookupError> {
        Err(LookupError::backend(self.message.clone()))
    }
}

/// Finder that blocks the calling thread before delegating.
///
/// Slow categories sleep for `delay`; others answer immediately.
#[derive(Debug)]
pub struct SlowFinder<F> {
    inner: F,
    delay: Duration,
    slow: Vec<PoiCategory>,
}

impl<F: NearestFinder> SlowFinder<F> {
    /// Delay every category by `delay`.
    #[must_use]
    pub fn new(inner: F, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            slow: PoiCategory::ALL.to_vec(),
        }
    }

    /// Delay only `categories`.
    #[must_use]
    pub fn only(mut self, categories: &[PoiCategory]) -> Self {
        self.slow = categories.to_vec();
        self
    }
}

impl<F: NearestFinder> NearestFinder for SlowFinder<F> {
    fn nearest(
        &self,
        category: PoiCategory,
        point: GeoPoint,
    ) -> Result<Option<PoiRecord>, LookupError> {
        if self.slow.contains(&category) {
            thread::sleep(self.delay);
        }
        self.inner.nearest(category, point)
    }
}

/// Finder that counts lookups before delegating.
#[derive(Debug)]
pub struct CountingFinder<F> {
    inner: F,
    calls: AtomicUsize,
}

impl<F: NearestFinder> CountingFinder<F> {
    /// Wrap `inner`.
    #[must_use]
    pub const fn new(inner: F) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups issued so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<F: NearestFinder> NearestFinder for CountingFinder<F> {
    fn nearest(
        &self,
        category: PoiCategory,
        point: GeoPoint,
    ) -> Result<Option<PoiRecord>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.nearest(category, point)
    }
}
