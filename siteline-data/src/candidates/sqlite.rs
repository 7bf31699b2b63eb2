//! SQLite-backed candidate store.

use std::collections::HashSet;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, params_from_iter};
use siteline_core::Candidate;
use thiserror::Error;

use super::{CandidateFilter, CandidateSource};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS offices (
    company TEXT NOT NULL,
    category_code TEXT,
    employees INTEGER,
    raised_amount INTEGER,
    city TEXT,
    address TEXT,
    latitude REAL,
    longitude REAL
);
CREATE INDEX IF NOT EXISTS offices_city ON offices (city);
";

/// Errors raised while reading candidate offices.
#[derive(Debug, Error)]
pub enum CandidateStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open candidate database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Generic SQLite error when reading office rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Create the `offices` table and its index when missing.
///
/// # Errors
/// Propagates SQLite failures.
pub fn create_schema(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(SCHEMA)
}

/// Read-only candidate store over an `offices` table.
pub struct SqliteCandidateStore {
    connection: Connection,
}

impl fmt::Debug for SqliteCandidateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteCandidateStore")
            .field("path", &self.connection.path())
            .finish_non_exhaustive()
    }
}

impl SqliteCandidateStore {
    /// Open the database at `path` read-only.
    ///
    /// # Errors
    /// Returns [`CandidateStoreError::OpenDatabase`] when the file is missing
    /// or not a SQLite database.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, CandidateStoreError> {
        let database_path = path.as_ref();
        let connection =
            Connection::open_with_flags(database_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
                |source| CandidateStoreError::OpenDatabase {
                    path: database_path.to_path_buf(),
                    source,
                },
            )?;
        Ok(Self { connection })
    }

    /// Wrap an existing connection, e.g. an in-memory database.
    #[must_use]
    pub const fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    /// Office counts per city for `filter`, ignoring its city criterion.
    ///
    /// Largest cities come first; ties are ordered by name. Offices without a
    /// city are not counted.
    ///
    /// # Errors
    /// Propagates SQLite failures.
    pub fn count_by_city(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<(String, u64)>, CandidateStoreError> {
        let (clause, values) = conditions(filter, false);
        let sql = format!(
            "SELECT city, COUNT(*) AS total FROM offices \
             WHERE city IS NOT NULL{clause} \
             GROUP BY city ORDER BY total DESC, city"
        );
        let mut statement = self.connection.prepare(&sql)?;
        let rows = statement.query_map(params_from_iter(values), |row| {
            let city: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((city, u64::try_from(count).unwrap_or_default()))
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }
}

impl CandidateSource for SqliteCandidateStore {
    fn candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>, CandidateStoreError> {
        let (clause, values) = conditions(filter, true);
        let sql = format!(
            "SELECT company, latitude, longitude FROM offices \
             WHERE 1 = 1{clause} ORDER BY rowid"
        );
        let mut statement = self.connection.prepare(&sql)?;
        let rows = statement.query_map(params_from_iter(values), |row| {
            let name: String = row.get(0)?;
            let latitude: Option<f64> = row.get(1)?;
            let longitude: Option<f64> = row.get(2)?;
            Ok((name, latitude, longitude))
        })?;

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for row in rows {
            let (name, latitude, longitude) = row?;
            let key = (name.clone(), latitude.map(f64::to_bits), longitude.map(f64::to_bits));
            if !seen.insert(key) {
                log::debug!("skipping duplicate office row for '{name}'");
                continue;
            }
            candidates.push(match (latitude, longitude) {
                (Some(lat), Some(lon)) => Candidate::from_raw(name, lon, lat),
                _ => Candidate::unlocated(name),
            });
        }
        log::debug!("{} candidate offices match {filter:?}", candidates.len());
        Ok(candidates)
    }
}

/// SQL conditions (each prefixed with ` AND `) and their bound values.
fn conditions(filter: &CandidateFilter, include_city: bool) -> (String, Vec<Value>) {
    let mut sql = String::new();
    let mut values = Vec::new();
    if include_city && let Some(city) = &filter.city {
        sql.push_str(" AND city = ?");
        values.push(Value::Text(city.clone()));
    }
    if let Some(min) = filter.min_employees {
        sql.push_str(" AND employees >= ?");
        values.push(Value::Integer(i64::from(min)));
    }
    if let Some(max) = filter.max_employees {
        sql.push_str(" AND employees <= ?");
        values.push(Value::Integer(i64::from(max)));
    }
    if !filter.category_codes.is_empty() {
        let placeholders = vec!["?"; filter.category_codes.len()].join(", ");
        sql.push_str(&format!(" AND category_code IN ({placeholders})"));
        values.extend(filter.category_codes.iter().cloned().map(Value::Text));
    }
    if let Some(amount) = filter.min_raised_amount {
        sql.push_str(" AND raised_amount > ?");
        values.push(Value::Integer(i64::try_from(amount).unwrap_or(i64::MAX)));
    }
    (sql, values)
}
