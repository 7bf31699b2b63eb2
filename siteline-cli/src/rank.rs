//! Rank command implementation for the Siteline CLI.

use std::collections::BTreeMap;
use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use siteline_core::{CategoryPolicy, PoiIndex, PolicyTable, Ranking};
use siteline_data::{
    CandidateFilter, CandidateSource, SqliteCandidateStore, VenueCache, venues_to_records,
};
use siteline_scorer::{
    CancelMode, DEFAULT_LOOKUP_TIMEOUT, ScoringOptions, score_candidates_concurrently,
};
use tokio_util::sync::CancellationToken;

use crate::{
    ARG_CACHE_DIR, ARG_CANDIDATES_DB, ARG_LOOKUP_TIMEOUT_MS, ARG_POLICIES, ARG_WORKERS, CliError,
    DEFAULT_CACHE_DIR, ENV_CANDIDATES_DB, require_existing, write_json,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score candidate offices from a SQLite database against the \
                 venues cached by `siteline fetch`. Filters default to gaming \
                 studios in San Francisco with 87 to 150 employees; policies \
                 default to the reference weighting.",
    about = "Rank candidate offices by proximity to amenities"
)]
#[ortho_config(prefix = "SITELINE")]
pub(crate) struct RankArgs {
    /// SQLite database holding the `offices` table.
    #[arg(long = ARG_CANDIDATES_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) candidates_db: Option<Utf8PathBuf>,
    /// Directory of cached venues (one JSON file per category).
    #[arg(long = ARG_CACHE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) cache_dir: Option<Utf8PathBuf>,
    /// Only consider offices in this city.
    #[arg(long, value_name = "name")]
    #[serde(default)]
    pub(crate) city: Option<String>,
    /// Smallest acceptable head count.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) min_employees: Option<u32>,
    /// Largest acceptable head count.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) max_employees: Option<u32>,
    /// Accepted industry code; repeat for several.
    #[arg(long, value_name = "code")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) category_code: Vec<String>,
    /// Only consider companies that raised more than this amount.
    #[arg(long, value_name = "amount")]
    #[serde(default)]
    pub(crate) min_raised_amount: Option<u64>,
    /// JSON file mapping category names to policies.
    #[arg(long = ARG_POLICIES, value_name = "path")]
    #[serde(default)]
    pub(crate) policies: Option<Utf8PathBuf>,
    /// Number of candidates scored at once.
    #[arg(long = ARG_WORKERS, value_name = "count")]
    #[serde(default)]
    pub(crate) workers: Option<usize>,
    /// Bound on each nearest-venue lookup, in milliseconds.
    #[arg(long = ARG_LOOKUP_TIMEOUT_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) lookup_timeout_ms: Option<u64>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankConfig {
    /// SQLite database of candidate offices.
    pub(crate) candidates_db: Utf8PathBuf,
    /// Venue cache directory.
    pub(crate) cache_dir: Utf8PathBuf,
    /// Candidate selection.
    pub(crate) filter: CandidateFilter,
    /// Policy file; the reference table applies when absent.
    pub(crate) policies: Option<Utf8PathBuf>,
    /// Worker override; defaults to available parallelism.
    pub(crate) workers: Option<NonZeroUsize>,
    /// Bound on each lookup.
    pub(crate) lookup_timeout: Duration,
}

impl RankConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.candidates_db, ARG_CANDIDATES_DB)?;
        if let Some(policies) = &self.policies {
            require_existing(policies, ARG_POLICIES)?;
        }
        Ok(())
    }
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let candidates_db = args.candidates_db.ok_or(CliError::MissingArgument {
            field: ARG_CANDIDATES_DB,
            env: ENV_CANDIDATES_DB,
        })?;
        let cache_dir = args
            .cache_dir
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CACHE_DIR));

        let reference = CandidateFilter::reference();
        let filter = CandidateFilter {
            city: args.city.or(reference.city),
            min_employees: args.min_employees.or(reference.min_employees),
            max_employees: args.max_employees.or(reference.max_employees),
            category_codes: if args.category_code.is_empty() {
                reference.category_codes
            } else {
                args.category_code
            },
            min_raised_amount: args.min_raised_amount,
        };
        if let (Some(min), Some(max)) = (filter.min_employees, filter.max_employees)
            && min > max
        {
            return Err(CliError::InvalidArgument {
                field: "min-employees",
                reason: format!("{min} exceeds the maximum of {max}"),
            });
        }

        let workers = args
            .workers
            .map(|count| {
                NonZeroUsize::new(count).ok_or_else(|| CliError::InvalidArgument {
                    field: ARG_WORKERS,
                    reason: "must be at least 1".to_owned(),
                })
            })
            .transpose()?;
        let lookup_timeout = match args.lookup_timeout_ms {
            None => DEFAULT_LOOKUP_TIMEOUT,
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_LOOKUP_TIMEOUT_MS,
                    reason: "must be at least 1".to_owned(),
                });
            }
            Some(ms) => Duration::from_millis(ms),
        };

        Ok(Self {
            candidates_db,
            cache_dir,
            filter,
            policies: args.policies,
            workers,
            lookup_timeout,
        })
    }
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &mut stdout)
}

pub(crate) fn run_rank_with(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let ranking = execute_rank(&config)?;
    write_json(writer, &ranking)
}

pub(crate) fn execute_rank(config: &RankConfig) -> Result<Ranking, CliError> {
    let policies = load_policies(config.policies.as_deref())?;
    let store = SqliteCandidateStore::open(&config.candidates_db)?;
    let candidates = store.candidates(&config.filter)?;
    let index = load_index(&VenueCache::new(config.cache_dir.clone()), &policies)?;
    log::info!(
        "scoring {} candidates across {} categories ({} venues)",
        candidates.len(),
        policies.len(),
        index.len()
    );

    let token = CancellationToken::new();
    let mut options = ScoringOptions::default()
        .with_lookup_timeout(config.lookup_timeout)
        .with_cancellation(token.clone())
        .with_cancel_mode(CancelMode::Truncate);
    if let Some(workers) = config.workers {
        options = options.with_workers(workers);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let ranking = runtime.block_on(async {
        let interrupt = tokio::spawn(cancel_on_interrupt(token));
        let outcome = score_candidates_concurrently(
            candidates,
            Arc::new(policies),
            Arc::new(index),
            &options,
        )
        .await;
        interrupt.abort();
        outcome
    })?;

    for diagnostic in &ranking.diagnostics {
        log::warn!("{diagnostic}");
    }
    if ranking.truncated {
        log::warn!(
            "interrupted: ranking holds only the {} candidates scored so far",
            ranking.ranked.len()
        );
    }
    Ok(ranking)
}

async fn cancel_on_interrupt(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        log::warn!("interrupt received; stopping after in-flight lookups");
        token.cancel();
    }
}

/// Load the policy table from `path`, or the reference table when absent.
pub(crate) fn load_policies(path: Option<&Utf8Path>) -> Result<PolicyTable, CliError> {
    let Some(path) = path else {
        return Ok(PolicyTable::reference());
    };
    let contents = siteline_fs::read_to_string(path).map_err(|source| CliError::ReadPolicies {
        path: path.to_path_buf(),
        source,
    })?;
    let entries: BTreeMap<String, CategoryPolicy> =
        serde_json::from_str(&contents).map_err(|source| CliError::ParsePolicies {
            path: path.to_path_buf(),
            source,
        })?;
    PolicyTable::from_entries(entries).map_err(|source| CliError::InvalidPolicies {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the venue index for every category in `policies` from the cache.
pub(crate) fn load_index(cache: &VenueCache, policies: &PolicyTable) -> Result<PoiIndex, CliError> {
    let mut collections = Vec::with_capacity(policies.len());
    for category in policies.categories() {
        match cache.load(category)? {
            Some(venues) => collections.push((category, venues_to_records(category, &venues))),
            None => log::warn!(
                "no cached venues for {category} in {}; run `siteline fetch` first",
                cache.dir()
            ),
        }
    }
    Ok(PoiIndex::from_collections(collections))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
