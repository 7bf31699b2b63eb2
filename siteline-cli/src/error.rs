//! Error types emitted by the Siteline CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use siteline_core::PolicyError;
use siteline_data::{CandidateStoreError, VenueCacheError, VenueSearchError};
use siteline_scorer::ScoreError;
use thiserror::Error;

/// Errors emitted by the Siteline CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// An option was supplied with an unusable value.
    #[error("invalid --{field}: {reason}")]
    InvalidArgument {
        /// Flag name.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading the policy file failed.
    #[error("failed to read policies from {path:?}: {source}")]
    ReadPolicies {
        /// Policy file location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The policy file is not a JSON object of category policies.
    #[error("failed to parse policies in {path:?}: {source}")]
    ParsePolicies {
        /// Policy file location.
        path: Utf8PathBuf,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The policy file holds an invalid policy.
    #[error("invalid policies in {path:?}: {source}")]
    InvalidPolicies {
        /// Policy file location.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: PolicyError,
    },
    /// Reading candidate offices failed.
    #[error(transparent)]
    Candidates(#[from] CandidateStoreError),
    /// Reading cached venues failed.
    #[error(transparent)]
    VenueCache(#[from] VenueCacheError),
    /// Constructing the venue search client failed.
    #[error(transparent)]
    VenueClient(#[from] VenueSearchError),
    /// Some categories could not be fetched.
    #[error("failed to fetch venues for {failed} of {total} categories")]
    FetchIncomplete {
        /// Categories that failed.
        failed: usize,
        /// Categories requested.
        total: usize,
    },
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Concurrent scoring stopped without a ranking.
    #[error(transparent)]
    Score(#[from] ScoreError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
