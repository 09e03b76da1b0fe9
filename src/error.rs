//! Error types for every stage of the summarization pipeline.
//!
//! Fetch, cache and search failures are recovered locally by the stage that
//! sees them and only surface in logs. [`SummaryError`] is what a caller of
//! [`crate::engine::NewsSummarizer::summarize`] can receive.

use thiserror::Error;

/// Failure to retrieve a page over HTTP.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Failure of the cache backing store. Never propagated past the fetcher.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Failure of the external article-search provider.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search request timed out")]
    Timeout,

    #[error("search transport error: {0}")]
    Transport(String),

    #[error("search provider returned HTTP status {0}")]
    Status(u16),

    #[error("search provider reported an error: {0}")]
    Provider(String),

    #[error("no API key configured for the search provider")]
    MissingApiKey,
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout
        } else if let Some(status) = e.status() {
            SearchError::Status(status.as_u16())
        } else {
            SearchError::Transport(e.to_string())
        }
    }
}

/// Failure kinds of a summarization request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("fetch timed out")]
    FetchTimeout,

    #[error("fetch failed: {0}")]
    FetchTransportError(String),

    #[error("no extractable content at {0}")]
    NoExtractableContent(String),

    #[error("no documents available to summarize")]
    EmptyCorpus,

    #[error("could not build a vector space: {0}")]
    VectorizationFailure(String),

    #[error("no sentences found in content")]
    NoSentences,
}

impl SummaryError {
    /// Stable identifier for the failure kind, suitable for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            SummaryError::FetchTimeout => "fetch_timeout",
            SummaryError::FetchTransportError(_) => "fetch_transport_error",
            SummaryError::NoExtractableContent(_) => "no_extractable_content",
            SummaryError::EmptyCorpus => "empty_corpus",
            SummaryError::VectorizationFailure(_) => "vectorization_failure",
            SummaryError::NoSentences => "no_sentences",
        }
    }
}

impl From<FetchError> for SummaryError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Timeout => SummaryError::FetchTimeout,
            other => SummaryError::FetchTransportError(other.to_string()),
        }
    }
}

/// Failure to load the YAML configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
