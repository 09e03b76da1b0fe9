//! Runtime configuration loaded from an optional YAML file.
//!
//! Every field has a default so an empty (or missing) file is a valid
//! configuration. Command-line flags are applied on top in `main`.
//!
//! ```yaml
//! fetch:
//!   timeout_secs: 10
//! cache:
//!   backend: disk
//!   dir: /var/cache/news_distill
//!   ttl_hours: 24
//! search:
//!   page_size: 5
//!   recency_days: 2
//! summary:
//!   strategy: mmr
//!   sentences: 5
//!   lambda: 0.5
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// Desktop browser identification; some publishers reject other clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Upper bound on candidate articles fetched at once.
    pub max_concurrent: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: BROWSER_USER_AGENT.to_string(),
            max_concurrent: 5,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackendKind {
    Memory,
    Disk,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackendKind,
    pub dir: String,
    pub ttl_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Memory,
            dir: ".news_distill_cache".to_string(),
            ttl_hours: 24,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(60 * 60))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub page_size: usize,
    pub recency_days: i64,
    pub language: String,
    pub sort_by: String,
    /// Number of seed keywords joined into the search query.
    pub query_terms: usize,
    /// Put the seed article's own text first in the corpus. When false the
    /// seed is only used if no related article yields text.
    ///
    /// Defaults to `true`, which departs from the fallback-only seed of the
    /// related-document collector; set it to `false` for that behaviour.
    pub include_seed: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2".to_string(),
            api_key: None,
            page_size: 5,
            recency_days: 2,
            language: "en".to_string(),
            sort_by: "relevancy".to_string(),
            query_terms: 5,
            include_seed: true,
        }
    }
}

/// Which extractive method produces the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// TF-IDF vector space with Maximal Marginal Relevance selection.
    Mmr,
    /// Count query-keyword hits per sentence.
    KeywordOverlap,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub strategy: Strategy,
    pub sentences: usize,
    pub lambda: f64,
    /// Keywords drawn from the corpus when the overlap method has no query.
    pub fallback_keywords: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Mmr,
            sentences: 5,
            lambda: 0.5,
            fallback_keywords: 10,
        }
    }
}

impl Config {
    /// Load a config file, or the defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Config::default());
        };
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&raw)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}

/// Clamp a relevance/diversity trade-off into `[0, 1]`; NaN becomes the default.
pub fn clamp_lambda(lambda: f64) -> f64 {
    if lambda.is_nan() {
        0.5
    } else {
        lambda.clamp(0.0, 1.0)
    }
}
