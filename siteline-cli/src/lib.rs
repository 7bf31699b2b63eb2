//! Command-line interface for Siteline's office scouting.
//!
//! `siteline fetch` fills the venue cache from the search API and
//! `siteline rank` scores candidate offices against the cached venues,
//! printing the ranking as JSON on stdout. Logs go to stderr, filtered by
//! `RUST_LOG`.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};

mod error;
mod fetch;
mod rank;

pub use error::CliError;

use fetch::{FetchArgs, run_fetch};
use rank::{RankArgs, run_rank};

pub(crate) const ARG_CANDIDATES_DB: &str = "candidates-db";
pub(crate) const ARG_CACHE_DIR: &str = "cache-dir";
pub(crate) const ARG_POLICIES: &str = "policies";
pub(crate) const ARG_WORKERS: &str = "workers";
pub(crate) const ARG_LOOKUP_TIMEOUT_MS: &str = "lookup-timeout-ms";
pub(crate) const ARG_TOKEN: &str = "token";
pub(crate) const ARG_LATITUDE: &str = "latitude";
pub(crate) const ARG_LONGITUDE: &str = "longitude";
pub(crate) const ARG_CATEGORY: &str = "category";
pub(crate) const ENV_CANDIDATES_DB: &str = "SITELINE_CMDS_RANK_CANDIDATES_DB";
pub(crate) const ENV_TOKEN: &str = "SITELINE_CMDS_FETCH_TOKEN";

/// Default cache directory, relative to the working directory.
pub(crate) const DEFAULT_CACHE_DIR: &str = "data";

/// Run the Siteline CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid or the
/// selected command fails.
pub fn run() -> Result<(), CliError> {
    init_logging();
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => run_rank(args),
        Command::Fetch(args) => run_fetch(args),
    }
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
    if installed.is_err() {
        log::debug!("logging already initialised");
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "siteline",
    about = "Rank candidate office locations by proximity to amenities",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score candidate offices against cached venues and print the ranking.
    Rank(RankArgs),
    /// Fetch venues for each category into the cache.
    Fetch(FetchArgs),
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match siteline_fs::is_regular_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: serde::Serialize>(
    writer: &mut dyn std::io::Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
