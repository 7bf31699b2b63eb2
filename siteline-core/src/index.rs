//! In-memory nearest-neighbour index over POI records.
//!
//! Each category gets its own R\*-tree. Positions are embedded on the unit
//! sphere as 3D vectors, and chord length grows monotonically with
//! great-circle distance, so the tree's Euclidean nearest neighbour is the
//! exact great-circle nearest neighbour. The only approximation relative to
//! [`distance_meters`](crate::distance_meters) is the sphere versus ellipsoid
//! difference (at most about 0.5%), which can reorder only venues whose
//! distances differ by less than that.

use std::collections::BTreeMap;

use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::{GeoPoint, LookupError, NearestFinder, PoiCategory, PoiRecord};

type IndexedPoi = GeomWithData<[f64; 3], PoiRecord>;

/// Per-category R\*-tree index answering [`NearestFinder`] queries.
///
/// The index is built once, up front, and shared read-only across scoring
/// workers.
///
/// # Examples
/// ```
/// use siteline_core::{GeoPoint, NearestFinder, PoiCategory, PoiIndex, PoiRecord};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let index = PoiIndex::from_records([
///     PoiRecord::new("Far", PoiCategory::Bar, GeoPoint::new(1.0, 1.0)?),
///     PoiRecord::new("Near", PoiCategory::Bar, GeoPoint::new(0.01, 0.0)?),
/// ]);
/// let hit = index.nearest(PoiCategory::Bar, GeoPoint::new(0.0, 0.0)?)?;
/// assert_eq!(hit.map(|poi| poi.name).as_deref(), Some("Near"));
/// assert!(index.nearest(PoiCategory::Ferry, GeoPoint::new(0.0, 0.0)?)?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PoiIndex {
    trees: BTreeMap<PoiCategory, RTree<IndexedPoi>>,
}

impl PoiIndex {
    /// Create an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trees: BTreeMap::new(),
        }
    }

    /// Build an index from records, grouping them by their own category.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PoiRecord>,
    {
        let mut grouped: BTreeMap<PoiCategory, Vec<IndexedPoi>> = BTreeMap::new();
        for record in records {
            grouped
                .entry(record.category)
                .or_default()
                .push(indexed(record));
        }
        Self::bulk_load(grouped)
    }

    /// Build an index from an explicit category-to-records mapping.
    ///
    /// The mapping key wins: records are filed under the category they are
    /// listed with.
    #[must_use]
    pub fn from_collections<I, R>(collections: I) -> Self
    where
        I: IntoIterator<Item = (PoiCategory, R)>,
        R: IntoIterator<Item = PoiRecord>,
    {
        let mut grouped: BTreeMap<PoiCategory, Vec<IndexedPoi>> = BTreeMap::new();
        for (category, records) in collections {
            let bucket = grouped.entry(category).or_default();
            bucket.extend(records.into_iter().map(|record| {
                indexed(PoiRecord {
                    category,
                    ..record
                })
            }));
        }
        Self::bulk_load(grouped)
    }

    fn bulk_load(grouped: BTreeMap<PoiCategory, Vec<IndexedPoi>>) -> Self {
        let trees = grouped
            .into_iter()
            .map(|(category, entries)| (category, RTree::bulk_load(entries)))
            .collect();
        Self { trees }
    }

    /// Add a single record.
    pub fn insert(&mut self, record: PoiRecord) {
        self.trees
            .entry(record.category)
            .or_default()
            .insert(indexed(record));
    }

    /// Total number of indexed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.values().map(RTree::size).sum()
    }

    /// Report whether no record is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records indexed for `category`.
    #[must_use]
    pub fn category_len(&self, category: PoiCategory) -> usize {
        self.trees.get(&category).map_or(0, RTree::size)
    }
}

impl NearestFinder for PoiIndex {
    fn nearest(
        &self,
        category: PoiCategory,
        point: GeoPoint,
    ) -> Result<Option<PoiRecord>, LookupError> {
        let Some(tree) = self.trees.get(&category) else {
            return Ok(None);
        };
        let hit = tree.nearest_neighbor(&unit_vector(point));
        if let Some(found) = hit {
            log::trace!("nearest {category} to {point:?} is '{}'", found.data.name);
        }
        Ok(hit.map(|found| found.data.clone()))
    }
}

fn indexed(record: PoiRecord) -> IndexedPoi {
    GeomWithData::new(unit_vector(record.location), record)
}

#[expect(clippy::float_arithmetic, reason = "spherical embedding")]
fn unit_vector(point: GeoPoint) -> [f64; 3] {
    let lat = point.latitude().to_radians();
    let lon = point.longitude().to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}
