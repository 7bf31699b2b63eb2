//! Fetch command implementation for the Siteline CLI.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use siteline_core::{GeoPoint, GeoPointError, PoiCategory, UnknownCategory};
use siteline_data::venues::{
    DEFAULT_BASE_URL, DEFAULT_LIMIT, DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_INTERVAL,
};
use siteline_data::{
    FetchReport, VenueCache, VenueSearch, VenueSearchClient, VenueSearchConfig, VenueSource,
};

use crate::{
    ARG_CACHE_DIR, ARG_CATEGORY, ARG_LATITUDE, ARG_LONGITUDE, ARG_TOKEN, CliError,
    DEFAULT_CACHE_DIR, ENV_TOKEN, write_json,
};

/// Latitude the reference search is centred on (SoMa, San Francisco).
pub(crate) const DEFAULT_LATITUDE: f64 = 37.780_430_1;
/// Longitude the reference search is centred on.
pub(crate) const DEFAULT_LONGITUDE: f64 = -122.410_330_5;
/// Categories where only the closest handful of venues matter.
const SPARSE_CATEGORIES: [PoiCategory; 2] = [PoiCategory::Airport, PoiCategory::Ferry];
const SPARSE_LIMIT: u32 = 5;

/// CLI arguments for the `fetch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search the venue API for each category and store the results \
                 in the cache directory. Categories already cached are not \
                 fetched again; delete their files to refresh them.",
    about = "Fill the venue cache from the search API"
)]
#[ortho_config(prefix = "SITELINE")]
pub(crate) struct FetchArgs {
    /// Directory receiving one JSON file per category.
    #[arg(long = ARG_CACHE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) cache_dir: Option<Utf8PathBuf>,
    /// API key for the venue search service.
    #[arg(long = ARG_TOKEN, value_name = "key")]
    #[serde(default)]
    pub(crate) token: Option<String>,
    /// Latitude the search is centred on.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude the search is centred on.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Venues requested per category.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<u32>,
    /// Search endpoint override.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Pause between API requests, in milliseconds.
    #[arg(long, value_name = "ms")]
    #[serde(default)]
    pub(crate) request_interval_ms: Option<u64>,
    /// Repeats after a rate-limited or failed request.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) max_retries: Option<u32>,
    /// Category to fetch; repeat for several. Defaults to every category.
    #[arg(long = ARG_CATEGORY, value_name = "name")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) category: Vec<String>,
}

impl FetchArgs {
    pub(crate) fn into_config(self) -> Result<FetchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FetchConfig::try_from(merged)
    }
}

/// Resolved `fetch` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct FetchConfig {
    /// Cache directory.
    pub(crate) cache_dir: Utf8PathBuf,
    /// Categories to fetch, in request order.
    pub(crate) categories: Vec<PoiCategory>,
    /// Search client settings.
    pub(crate) search: VenueSearchConfig,
    /// Pause between API requests.
    pub(crate) request_interval: Duration,
    /// Repeats allowed after a transient search failure.
    pub(crate) max_retries: u32,
}

impl TryFrom<FetchArgs> for FetchConfig {
    type Error = CliError;

    fn try_from(args: FetchArgs) -> Result<Self, Self::Error> {
        let token = args
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_TOKEN,
                env: ENV_TOKEN,
            })?;
        let cache_dir = args
            .cache_dir
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CACHE_DIR));

        let latitude = args.latitude.unwrap_or(DEFAULT_LATITUDE);
        let longitude = args.longitude.unwrap_or(DEFAULT_LONGITUDE);
        let near = GeoPoint::new(longitude, latitude).map_err(|err| CliError::InvalidArgument {
            field: match err {
                GeoPointError::LatitudeOutOfRange(_) => ARG_LATITUDE,
                GeoPointError::NonFinite { latitude: lat, .. } if !lat.is_finite() => ARG_LATITUDE,
                _ => ARG_LONGITUDE,
            },
            reason: err.to_string(),
        })?;

        let limit = match args.limit {
            None => DEFAULT_LIMIT,
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: "limit",
                    reason: "must be at least 1".to_owned(),
                });
            }
            Some(limit) => limit,
        };
        let mut search = VenueSearchConfig::new(token)
            .with_base_url(args.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()))
            .with_near(near)
            .with_limit(limit);
        for category in SPARSE_CATEGORIES {
            search = search.with_category_limit(category, SPARSE_LIMIT.min(limit));
        }

        Ok(Self {
            cache_dir,
            categories: parse_categories(&args.category)?,
            search,
            request_interval: args
                .request_interval_ms
                .map_or(DEFAULT_REQUEST_INTERVAL, Duration::from_millis),
            max_retries: args.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        })
    }
}

/// Parse category names, keeping the first occurrence of each.
///
/// An empty list selects every category.
fn parse_categories(names: &[String]) -> Result<Vec<PoiCategory>, CliError> {
    if names.is_empty() {
        return Ok(PoiCategory::ALL.to_vec());
    }
    let mut categories = Vec::with_capacity(names.len());
    for name in names {
        let category: PoiCategory = name.parse().map_err(|err: UnknownCategory| {
            CliError::InvalidArgument {
                field: ARG_CATEGORY,
                reason: err.to_string(),
            }
        })?;
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    Ok(categories)
}

/// Builds the venue search backend used by `fetch`.
pub(crate) trait VenueSearchBuilder {
    /// Search implementation produced by the builder.
    type Search: VenueSearch;

    /// Construct a search backend for `config`.
    fn build(&self, config: &FetchConfig) -> Result<Self::Search, CliError>;
}

/// Builds the HTTP client for the configured endpoint.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct HttpSearchBuilder;

impl VenueSearchBuilder for HttpSearchBuilder {
    type Search = VenueSearchClient;

    fn build(&self, config: &FetchConfig) -> Result<Self::Search, CliError> {
        Ok(VenueSearchClient::new(config.search.clone())?)
    }
}

/// JSON summary printed by `fetch`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct FetchSummary {
    pub(crate) cache_dir: Utf8PathBuf,
    pub(crate) fetched: Vec<FetchedCategory>,
    pub(crate) failed: Vec<FailedCategory>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct FetchedCategory {
    pub(crate) category: PoiCategory,
    pub(crate) venues: usize,
    pub(crate) from_cache: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct FailedCategory {
    pub(crate) category: PoiCategory,
    pub(crate) error: String,
}

impl FetchSummary {
    fn from_report(cache_dir: Utf8PathBuf, report: &FetchReport) -> Self {
        Self {
            cache_dir,
            fetched: report
                .categories
                .iter()
                .map(|fetch| FetchedCategory {
                    category: fetch.category,
                    venues: fetch.venues.len(),
                    from_cache: fetch.from_cache,
                })
                .collect(),
            failed: report
                .failures
                .iter()
                .map(|failure| FailedCategory {
                    category: failure.category,
                    error: failure.error.to_string(),
                })
                .collect(),
        }
    }
}

pub(crate) fn run_fetch(args: FetchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_fetch_with(args, &HttpSearchBuilder, &mut stdout)
}

pub(crate) fn run_fetch_with<B: VenueSearchBuilder>(
    args: FetchArgs,
    builder: &B,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_fetch(&config, builder)?;
    let summary = FetchSummary::from_report(config.cache_dir.clone(), &report);
    write_json(writer, &summary)?;
    if report.is_complete() {
        Ok(())
    } else {
        Err(CliError::FetchIncomplete {
            failed: report.failures.len(),
            total: config.categories.len(),
        })
    }
}

pub(crate) fn execute_fetch<B: VenueSearchBuilder>(
    config: &FetchConfig,
    builder: &B,
) -> Result<FetchReport, CliError> {
    let search = builder.build(config)?;
    let source = VenueSource::new(search, VenueCache::new(config.cache_dir.clone()))
        .with_request_interval(config.request_interval)
        .with_max_retries(config.max_retries);
    log::info!(
        "fetching {} categories into {}",
        config.categories.len(),
        config.cache_dir
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let report = runtime.block_on(source.fetch_all(config.categories.iter().copied()));
    log::info!(
        "fetched {} categories, {} failed",
        report.categories.len(),
        report.failures.len()
    );
    Ok(report)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<FetchConfig, CliError> {
    let merged = FetchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    FetchConfig::try_from(merged)
}
