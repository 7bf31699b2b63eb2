//! Test helpers for seeding candidate databases, venue caches and policies.

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::Connection;
use siteline_core::PoiCategory;
use siteline_data::candidates::create_schema;
use siteline_data::{Venue, VenueCache};
use tempfile::TempDir;

/// Office rows: company, category code, employees, city, latitude, longitude.
pub(super) type Office = (
    &'static str,
    &'static str,
    i64,
    &'static str,
    Option<f64>,
    Option<f64>,
);

/// Offices matching the reference filter, plus one that does not.
pub(super) const OFFICES: [Office; 4] = [
    ("Far Studio", "games_video", 120, "San Francisco", Some(37.79), Some(-122.40)),
    ("Near Studio", "games_video", 100, "San Francisco", Some(37.78), Some(-122.41)),
    ("Ghost Studio", "games_video", 95, "San Francisco", None, None),
    ("Bank Corp", "finance", 120, "San Francisco", Some(37.78), Some(-122.41)),
];

/// A Starbucks on top of "Near Studio".
pub(super) fn starbucks() -> Vec<Venue> {
    vec![Venue::new("Starbucks Market St", 37.78, -122.41)]
}

/// Temporary workspace holding an offices database and a venue cache.
pub(super) struct Workspace {
    _dir: TempDir,
    pub(super) root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn db_path(&self) -> Utf8PathBuf {
        self.root.join("offices.db")
    }

    pub(super) fn cache_dir(&self) -> Utf8PathBuf {
        self.root.join("cache")
    }

    pub(super) fn policies_path(&self) -> Utf8PathBuf {
        self.root.join("policies.json")
    }

    pub(super) fn cache(&self) -> VenueCache {
        VenueCache::new(self.cache_dir())
    }

    pub(super) fn seed_offices(&self) {
        seed_offices(&self.db_path(), &OFFICES);
    }

    pub(super) fn seed_starbucks(&self) {
        self.cache()
            .store(PoiCategory::Starbucks, &starbucks())
            .expect("seed venue cache");
    }

    /// Score only Starbucks proximity, full weight within one kilometre.
    pub(super) fn write_starbucks_policy(&self) {
        write_utf8(
            &self.policies_path(),
            br#"{ "starbucks": { "max_distance_meters": 1000.0, "weight": 1.0 } }"#,
        );
    }
}

pub(super) fn seed_offices(path: &Utf8Path, offices: &[Office]) {
    let connection = Connection::open(path).expect("create database");
    create_schema(&connection).expect("create schema");
    for office in offices {
        connection
            .execute(
                "INSERT INTO offices \
                 (company, category_code, employees, city, latitude, longitude) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![office.0, office.1, office.2, office.3, office.4, office.5],
            )
            .expect("insert office");
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write file");
}
