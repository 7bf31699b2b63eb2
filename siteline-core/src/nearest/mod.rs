//! Nearest-neighbour lookups per POI category.
//!
//! The [`NearestFinder`] trait abstracts "find the single closest known venue
//! of this category". Absence is a normal answer (`Ok(None)`); failures are
//! reported as [`LookupError`] so callers can tell the two apart.

mod error;
mod finder;

pub use error::LookupError;
pub use finder::NearestFinder;
