//! HTTP client for the venue search API.

use std::collections::BTreeMap;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use siteline_core::{GeoPoint, PoiCategory};
use thiserror::Error;
use url::Url;

use super::model::{SearchResponse, Venue};

/// Default endpoint of the venue search API.
pub const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v3/places/search";

/// Default user agent for venue search requests.
pub const DEFAULT_USER_AGENT: &str = "siteline-venues/0.1";

/// Default number of venues requested per category.
pub const DEFAULT_LIMIT: u32 = 30;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while searching for venues.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VenueSearchError {
    /// The configured base URL does not parse.
    #[error("invalid venue search URL '{url}': {source}")]
    InvalidBaseUrl {
        /// Offending URL text.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// Builder error reported by `reqwest`.
        #[source]
        source: reqwest::Error,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
    },
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The request failed at the transport level.
    #[error("network error contacting {url}: {source}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// I/O error reported by the transport.
        #[source]
        source: io::Error,
    },
    /// The response body was not the expected JSON document.
    #[error("failed to decode response from {url}: {source}")]
    Parse {
        /// Fully qualified request URL.
        url: String,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

impl VenueSearchError {
    /// Report whether repeating the request may succeed.
    ///
    /// Rate limiting, server errors, timeouts and transport failures are
    /// transient; configuration, authorisation and decoding errors are not.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::InvalidBaseUrl { .. } | Self::Client { .. } | Self::Parse { .. } => false,
        }
    }
}

/// Source of venues for one category at a time.
#[async_trait(?Send)]
pub trait VenueSearch {
    /// Search for venues matching `category`.
    async fn search(&self, category: PoiCategory) -> Result<Vec<Venue>, VenueSearchError>;
}

/// Configuration for [`VenueSearchClient`].
#[derive(Debug, Clone)]
pub struct VenueSearchConfig {
    /// Search endpoint.
    pub base_url: String,
    /// API key sent verbatim in the `Authorization` header.
    pub token: String,
    /// Position the search is centred on. `None` lets the API choose.
    pub near: Option<GeoPoint>,
    /// Venues requested per category.
    pub limit: u32,
    /// Per-category overrides of `limit`.
    pub category_limits: BTreeMap<PoiCategory, u32>,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for VenueSearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            token: String::new(),
            near: None,
            limit: DEFAULT_LIMIT,
            category_limits: BTreeMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl VenueSearchConfig {
    /// Create a configuration using `token` against the default endpoint.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Set the search endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Centre searches on `point`.
    #[must_use]
    pub const fn with_near(mut self, point: GeoPoint) -> Self {
        self.near = Some(point);
        self
    }

    /// Set the default number of venues per category.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Override the number of venues requested for `category`.
    #[must_use]
    pub fn with_category_limit(mut self, category: PoiCategory, limit: u32) -> Self {
        self.category_limits.insert(category, limit);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Number of venues requested for `category`.
    #[must_use]
    pub fn limit_for(&self, category: PoiCategory) -> u32 {
        self.category_limits
            .get(&category)
            .copied()
            .unwrap_or(self.limit)
    }
}

/// HTTP implementation of [`VenueSearch`].
#[derive(Debug)]
pub struct VenueSearchClient {
    client: Client,
    base_url: Url,
    config: VenueSearchConfig,
}

impl VenueSearchClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    /// Returns [`VenueSearchError::InvalidBaseUrl`] when the endpoint does not
    /// parse and [`VenueSearchError::Client`] when `reqwest` rejects the
    /// configuration.
    pub fn new(config: VenueSearchConfig) -> Result<Self, VenueSearchError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| VenueSearchError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|source| VenueSearchError::Client { source })?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Configuration the client was built with.
    #[must_use]
    pub const fn config(&self) -> &VenueSearchConfig {
        &self.config
    }

    /// Full request URL for `category`.
    #[must_use]
    pub fn search_url(&self, category: PoiCategory) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("query", category.as_str());
            if let Some(near) = self.config.near {
                query.append_pair("ll", &format!("{},{}", near.latitude(), near.longitude()));
            }
            query.append_pair("limit", &self.config.limit_for(category).to_string());
        }
        url
    }
}

#[async_trait(?Send)]
impl VenueSearch for VenueSearchClient {
    async fn search(&self, category: PoiCategory) -> Result<Vec<Venue>, VenueSearchError> {
        let url = self.search_url(category);
        log::debug!("searching venues for {category}: {url}");
        let body = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, self.config.token.as_str())
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.config.user_agent.as_str())
            .send()
            .await
            .map_err(|err| convert_reqwest_error(err, url.as_str()))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(err, url.as_str()))?
            .bytes()
            .await
            .map_err(|err| convert_reqwest_error(err, url.as_str()))?;
        let response: SearchResponse =
            serde_json::from_slice(&body).map_err(|source| VenueSearchError::Parse {
                url: url.to_string(),
                source,
            })?;
        log::debug!("{} venues returned for {category}", response.results.len());
        Ok(response.results)
    }
}

fn convert_reqwest_error(error: reqwest::Error, url: &str) -> VenueSearchError {
    if let Some(status) = error.status() {
        return VenueSearchError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }
    if error.is_timeout() {
        return VenueSearchError::Timeout {
            url: url.to_owned(),
        };
    }
    VenueSearchError::Network {
        url: url.to_owned(),
        source: io::Error::other(error),
    }
}
