//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Hard ceiling on the page size accepted by the API.
pub const API_MAX_LIMIT: u32 = 1000;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API and HTTP client settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling and deduplication policy
    #[serde(default)]
    pub poll: PollConfig,

    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let endpoint = Url::parse(&self.api.endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "api.endpoint must be http(s), got {}",
                endpoint.scheme()
            )));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.poll.page_size == 0 || self.poll.page_size > API_MAX_LIMIT {
            return Err(AppError::validation(format!(
                "poll.page_size must be within 1..={API_MAX_LIMIT}"
            )));
        }
        if self.poll.max_recent == 0 {
            return Err(AppError::validation("poll.max_recent must be > 0"));
        }
        if self.poll.cache_capacity == 0 {
            return Err(AppError::validation("poll.cache_capacity must be > 0"));
        }
        if self.poll.overfetch_factor == 0 {
            return Err(AppError::validation("poll.overfetch_factor must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.poll.new_ratio_threshold) {
            return Err(AppError::validation(
                "poll.new_ratio_threshold must be within [0, 1]",
            ));
        }
        if self.poll.scan_interval_secs == 0 {
            return Err(AppError::validation("poll.scan_interval_secs must be > 0"));
        }
        if self.search.max_limit == 0 || self.search.max_limit > API_MAX_LIMIT {
            return Err(AppError::validation(format!(
                "search.max_limit must be within 1..={API_MAX_LIMIT}"
            )));
        }
        if self.search.default_limit == 0 || self.search.default_limit > self.search.max_limit {
            return Err(AppError::validation(
                "search.default_limit must be within 1..=search.max_limit",
            ));
        }
        Ok(())
    }
}

/// Remote API and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Records endpoint of the dataset
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Pagination cutoffs and cache bounds for poll cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Records requested per page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Recalls kept in a poll result
    #[serde(default = "defaults::max_recent")]
    pub max_recent: usize,

    /// Known ids remembered between cycles
    #[serde(default = "defaults::cache_capacity")]
    pub cache_capacity: usize,

    /// Stop paginating once `overfetch_factor * max_recent` records are collected
    #[serde(default = "defaults::overfetch_factor")]
    pub overfetch_factor: usize,

    /// Stop paginating once a page has fewer than this share of unseen ids
    #[serde(default = "defaults::new_ratio_threshold")]
    pub new_ratio_threshold: f64,

    /// Delay between scheduled poll cycles
    #[serde(default = "defaults::scan_interval")]
    pub scan_interval_secs: u64,
}

impl PollConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    /// Number of collected records that ends pagination.
    pub fn collect_limit(&self) -> usize {
        self.max_recent.saturating_mul(self.overfetch_factor)
    }

    /// Page size actually requested, within what the API accepts.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, API_MAX_LIMIT)
    }

    /// Minimum unseen ids a page needs for pagination to continue.
    pub fn min_new_per_page(&self) -> f64 {
        self.new_ratio_threshold * f64::from(self.effective_page_size())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
            max_recent: defaults::max_recent(),
            cache_capacity: defaults::cache_capacity(),
            overfetch_factor: defaults::overfetch_factor(),
            new_ratio_threshold: defaults::new_ratio_threshold(),
            scan_interval_secs: defaults::scan_interval(),
        }
    }
}

/// Defaults applied to search queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Limit used when the caller gives none, or an invalid one
    #[serde(default = "defaults::search_default_limit")]
    pub default_limit: u32,

    #[serde(default = "defaults::search_max_limit")]
    pub max_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: defaults::search_default_limit(),
            max_limit: defaults::search_max_limit(),
        }
    }
}

mod defaults {
    use super::API_MAX_LIMIT;

    // API defaults
    pub fn endpoint() -> String {
        "https://data.economie.gouv.fr/api/explore/v2.1/catalog/datasets/rappelconso-v2-gtin-espaces/records".into()
    }
    pub fn user_agent() -> String {
        concat!("recall-watcher/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Poll defaults
    pub fn page_size() -> u32 {
        100
    }
    pub fn max_recent() -> usize {
        50
    }
    pub fn cache_capacity() -> usize {
        1000
    }
    pub fn overfetch_factor() -> usize {
        2
    }
    pub fn new_ratio_threshold() -> f64 {
        0.2
    }
    pub fn scan_interval() -> u64 {
        3600
    }

    // Search defaults
    pub fn search_default_limit() -> u32 {
        100
    }
    pub fn search_max_limit() -> u32 {
        API_MAX_LIMIT
    }
}
