//! Per-category scoring policies: a distance cutoff and an importance weight.
//!
//! A [`PolicyTable`] is validated once, before any scoring starts. An invalid
//! entry is a configuration error that aborts the whole run, so the
//! aggregator itself never has to re-check policies.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::PoiCategory;

/// Scoring policy for one category.
///
/// `weight` is a relative importance in `0.0..=1.0`; weights across a table
/// need not sum to one. `max_distance_meters` is the distance at which the
/// category stops contributing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryPolicy {
    /// Distance in meters at which the normalised score reaches zero.
    pub max_distance_meters: f64,
    /// Relative importance in `0.0..=1.0`.
    pub weight: f64,
}

impl CategoryPolicy {
    /// Construct a policy. Validation happens when the policy joins a
    /// [`PolicyTable`].
    #[must_use]
    pub const fn new(max_distance_meters: f64, weight: f64) -> Self {
        Self {
            max_distance_meters,
            weight,
        }
    }

    fn validate(self, category: PoiCategory) -> Result<Self, PolicyError> {
        let max = self.max_distance_meters;
        if !max.is_finite() || max <= 0.0 {
            return Err(PolicyError::InvalidMaxDistance {
                category,
                value: max,
            });
        }
        if !(0.0..=1.0).contains(&self.weight) {
            return Err(PolicyError::InvalidWeight {
                category,
                value: self.weight,
            });
        }
        Ok(self)
    }
}

/// Errors raised while building a [`PolicyTable`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    /// No category carried a policy.
    #[error("policy table must contain at least one category")]
    Empty,
    /// A maximum distance was zero, negative or non-finite.
    #[error("max distance for '{category}' must be positive and finite (got {value})")]
    InvalidMaxDistance {
        /// Offending category.
        category: PoiCategory,
        /// Value as configured.
        value: f64,
    },
    /// A weight fell outside `0.0..=1.0` or was NaN.
    #[error("weight for '{category}' must be between 0.0 and 1.0 (got {value})")]
    InvalidWeight {
        /// Offending category.
        category: PoiCategory,
        /// Value as configured.
        value: f64,
    },
}

/// Validated mapping from category to policy.
///
/// Iteration follows [`PoiCategory`] declaration order.
///
/// # Examples
/// ```
/// use siteline_core::{CategoryPolicy, PoiCategory, PolicyTable};
///
/// # fn main() -> Result<(), siteline_core::PolicyError> {
/// let table = PolicyTable::new([(PoiCategory::School, CategoryPolicy::new(3000.0, 0.1))])?;
/// assert_eq!(table.len(), 1);
/// assert!(PolicyTable::new([(PoiCategory::Bar, CategoryPolicy::new(0.0, 0.1))]).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTable {
    policies: BTreeMap<PoiCategory, CategoryPolicy>,
}

impl PolicyTable {
    /// Validate and construct a table.
    ///
    /// Later entries for the same category replace earlier ones.
    ///
    /// # Errors
    /// Returns [`PolicyError`] for the first invalid entry, or
    /// [`PolicyError::Empty`] when no entries are supplied.
    pub fn new<I>(entries: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = (PoiCategory, CategoryPolicy)>,
    {
        let mut policies = BTreeMap::new();
        for (category, policy) in entries {
            policies.insert(category, policy.validate(category)?);
        }
        if policies.is_empty() {
            return Err(PolicyError::Empty);
        }
        Ok(Self { policies })
    }

    /// Build a table from string-keyed configuration entries.
    ///
    /// Keys that do not name a known category carry no weight: they are
    /// skipped with a warning and contribute nothing to any score.
    ///
    /// # Errors
    /// As for [`PolicyTable::new`].
    pub fn from_entries<I, K>(entries: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = (K, CategoryPolicy)>,
        K: AsRef<str>,
    {
        let known = entries.into_iter().filter_map(|(key, policy)| {
            let tag = key.as_ref();
            match tag.parse::<PoiCategory>() {
                Ok(category) => Some((category, policy)),
                Err(err) => {
                    log::warn!("ignoring policy entry: {err}");
                    None
                }
            }
        });
        Self::new(known)
    }

    /// The reference weighting for office scouting.
    ///
    /// Weights deliberately do not sum to one.
    #[must_use]
    pub fn reference() -> Self {
        let policies = REFERENCE_POLICIES
            .iter()
            .map(|&(category, max, weight)| (category, CategoryPolicy::new(max, weight)))
            .collect();
        Self { policies }
    }

    /// Return the policy for `category`, if configured.
    #[must_use]
    pub fn get(&self, category: PoiCategory) -> Option<&CategoryPolicy> {
        self.policies.get(&category)
    }

    /// Iterate over configured categories and their policies.
    pub fn iter(&self) -> impl Iterator<Item = (PoiCategory, &CategoryPolicy)> + '_ {
        self.policies.iter().map(|(category, policy)| (*category, policy))
    }

    /// Iterate over configured categories.
    pub fn categories(&self) -> impl Iterator<Item = PoiCategory> + '_ {
        self.policies.keys().copied()
    }

    /// Number of configured categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Report whether the table is empty. Validated tables never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::reference()
    }
}

const REFERENCE_POLICIES: [(PoiCategory, f64, f64); 11] = [
    (PoiCategory::School, 3000.0, 0.1),
    (PoiCategory::PetGrooming, 1000.0, 0.05),
    (PoiCategory::BasketballStadium, 10_000.0, 0.05),
    (PoiCategory::VeganRestaurant, 1000.0, 0.15),
    (PoiCategory::Ferry, 5000.0, 0.05),
    (PoiCategory::TrainStation, 1000.0, 0.05),
    (PoiCategory::Airport, 20_000.0, 0.05),
    (PoiCategory::NightClub, 1000.0, 0.1),
    (PoiCategory::Bar, 1000.0, 0.1),
    (PoiCategory::Starbucks, 1000.0, 0.15),
    (PoiCategory::DesignTalks, 1000.0, 0.15),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn reference_table_covers_every_category() {
        let table = PolicyTable::reference();
        assert_eq!(table.len(), PoiCategory::ALL.len());
        for category in PoiCategory::ALL {
            assert!(table.get(category).is_some(), "missing {category}");
        }
    }

    #[rstest]
    fn reference_table_is_valid() {
        let table = PolicyTable::reference();
        let rebuilt = PolicyTable::new(table.iter().map(|(c, p)| (c, *p))).expect("valid table");
        assert_eq!(rebuilt, table);
    }

    #[rstest]
    fn reference_values_match_the_published_weighting() {
        let table = PolicyTable::reference();
        assert_eq!(
            table.get(PoiCategory::Airport),
            Some(&CategoryPolicy::new(20_000.0, 0.05))
        );
        assert_eq!(
            table.get(PoiCategory::School),
            Some(&CategoryPolicy::new(3000.0, 0.1))
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_non_positive_max_distance(#[case] max: f64) {
        let err = PolicyTable::new([(PoiCategory::Bar, CategoryPolicy::new(max, 0.1))])
            .expect_err("invalid max distance");
        assert!(matches!(
            err,
            PolicyError::InvalidMaxDistance {
                category: PoiCategory::Bar,
                ..
            }
        ));
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.1)]
    #[case(f64::NAN)]
    fn rejects_out_of_range_weight(#[case] weight: f64) {
        let err = PolicyTable::new([(PoiCategory::Ferry, CategoryPolicy::new(100.0, weight))])
            .expect_err("invalid weight");
        assert!(matches!(err, PolicyError::InvalidWeight { .. }));
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    fn accepts_boundary_weights(#[case] weight: f64) {
        assert!(PolicyTable::new([(PoiCategory::Ferry, CategoryPolicy::new(1.0, weight))]).is_ok());
    }

    #[rstest]
    fn rejects_empty_table() {
        let err = PolicyTable::new(std::iter::empty()).expect_err("empty table");
        assert_eq!(err, PolicyError::Empty);
    }

    #[rstest]
    fn string_entries_skip_unknown_categories() {
        let table = PolicyTable::from_entries([
            ("bar", CategoryPolicy::new(1000.0, 0.1)),
            ("casino", CategoryPolicy::new(1000.0, 0.9)),
        ])
        .expect("known entry survives");
        assert_eq!(table.len(), 1);
        assert!(table.get(PoiCategory::Bar).is_some());
    }

    #[rstest]
    fn string_entries_still_validate_known_categories() {
        let err = PolicyTable::from_entries([("school", CategoryPolicy::new(-1.0, 0.1))])
            .expect_err("invalid policy");
        assert!(matches!(err, PolicyError::InvalidMaxDistance { .. }));
    }

    #[rstest]
    fn iteration_follows_declaration_order() {
        let table = PolicyTable::reference();
        let order: Vec<_> = table.categories().collect();
        assert_eq!(order, PoiCategory::ALL.to_vec());
    }
}
