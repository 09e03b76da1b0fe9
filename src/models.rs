//! Data models flowing through the summarization pipeline.
//!
//! - [`ArticleDocument`]: a fetched article and its extracted text, if any
//! - [`SearchResult`]: one candidate returned by the article-search provider
//! - [`Corpus`]: the bounded set of cleaned texts for one request
//! - [`SummaryResponse`]: what a caller of the engine receives
//! - [`CacheEntry`]: the stored shape of a cached article text

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An article as produced by the content fetcher.
///
/// `raw_text` is `None` when retrieval failed and `Some("")` when the page
/// loaded but held no paragraph text. Downstream both mean "no usable text".
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDocument {
    pub url: String,
    pub title: String,
    pub raw_text: Option<String>,
}

impl ArticleDocument {
    /// The extracted text, if retrieval succeeded and produced something.
    pub fn usable_text(&self) -> Option<&str> {
        self.raw_text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// One article reference returned by the search provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    /// Publisher name, e.g. "Reuters".
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Provenance of a document in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceInfo {
    pub title: String,
    pub url: String,
}

/// Cleaned document texts for one summarization request, in insertion order.
///
/// `sources` lists the related articles that contributed a document, in
/// the same order. The seed article's text carries no provenance entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pub documents: Vec<String>,
    pub sources: Vec<SourceInfo>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All documents joined with a single space, the input to segmentation.
    pub fn joined_text(&self) -> String {
        self.documents.join(" ")
    }
}

/// Result of a successful summarization.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SummaryResponse {
    pub summary_text: String,
    pub source_info: Vec<SourceInfo>,
    /// Query derived from the seed and used for the related-article search.
    pub query: String,
}

/// Stored shape of a cached article text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CacheEntry {
    pub content: String,
    pub cached_at: DateTime<Utc>,
    pub ttl_secs: u64,
}
