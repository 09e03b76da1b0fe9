//! Assemble the corpus for one request: the seed article's related coverage,
//! or the seed itself when no related article yields text.

use crate::api::{SearchProvider, SearchRequest};
use crate::cache::ContentCache;
use crate::config::SearchConfig;
use crate::error::SummaryError;
use crate::keywords::extract_keywords;
use crate::models::{Corpus, SearchResult, SourceInfo};
use crate::nlp::Nlp;
use crate::scrapers::article::{ArticleFetcher, PageSource};
use crate::scrapers::text::normalize_html;
use crate::utils::truncate_for_log;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

/// A corpus plus the query that was used to find its documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub corpus: Corpus,
    pub query: String,
}

/// Borrowed view over the pieces needed to collect related documents.
#[derive(Debug)]
pub struct RelatedCollector<'a, P, C, S> {
    fetcher: &'a ArticleFetcher<P, C>,
    search: &'a S,
    nlp: &'a Nlp,
    config: &'a SearchConfig,
    max_concurrent: usize,
}

impl<'a, P, C, S> RelatedCollector<'a, P, C, S>
where
    P: PageSource,
    C: ContentCache,
    S: SearchProvider,
{
    pub fn new(
        fetcher: &'a ArticleFetcher<P, C>,
        search: &'a S,
        nlp: &'a Nlp,
        config: &'a SearchConfig,
        max_concurrent: usize,
    ) -> Self {
        Self {
            fetcher,
            search,
            nlp,
            config,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Build the corpus around `seed_url`.
    ///
    /// Search errors and broken candidates shrink the corpus; if nothing
    /// survives, the seed's own text becomes the single document.
    ///
    /// # Arguments
    /// * `seed_url` - Article the request is about; also excluded from the candidates
    ///
    /// # Returns
    /// The corpus with one [`SourceInfo`] per related document, and the
    /// keyword query used for the search. Fails with
    /// [`SummaryError::NoExtractableContent`] only when the seed itself has no
    /// usable text.
    #[instrument(level = "info", skip(self))]
    pub async fn collect(&self, seed_url: &str) -> Result<Collection, SummaryError> {
        let seed = self.fetcher.fetch_document(seed_url, "").await;
        let Some(seed_text) = seed.usable_text() else {
            warn!("Seed article has no extractable content");
            return Err(SummaryError::NoExtractableContent(seed_url.to_string()));
        };

        let query = extract_keywords(self.nlp, seed_text, self.config.query_terms).join(" ");
        info!(%query, "Derived search query");

        let candidates = self.search_candidates(&query, seed_url).await;
        let mut corpus = self.fetch_candidates(candidates).await;

        if corpus.is_empty() {
            info!("No related article yielded text; using the seed article alone");
            corpus.documents.push(seed_text.to_string());
        } else if self.config.include_seed {
            corpus.documents.insert(0, seed_text.to_string());
        }
        info!(documents = corpus.len(), "Collected corpus");

        Ok(Collection { corpus, query })
    }

    async fn search_candidates(&self, query: &str, seed_url: &str) -> Vec<SearchResult> {
        if query.is_empty() {
            debug!("Empty query; skipping related-article search");
            return Vec::new();
        }
        let request = SearchRequest::recent(query, self.config, Utc::now());
        let results = match self.search.search(&request).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "Related-article search failed; treating as zero results");
                return Vec::new();
            }
        };
        let found = results.len();
        let candidates: Vec<SearchResult> = results
            .into_iter()
            .filter(|r| r.url != seed_url)
            .unique_by(|r| r.url.clone())
            .collect();
        info!(found, candidates = candidates.len(), "Related articles found");
        candidates
    }

    /// Fetch candidates concurrently, keeping provider order. Each failure
    /// only drops its own candidate.
    async fn fetch_candidates(&self, candidates: Vec<SearchResult>) -> Corpus {
        let fetched: Vec<Option<(String, SourceInfo)>> = stream::iter(candidates)
            .map(|candidate| async move {
                match self.fetcher.fetch(&candidate.url).await {
                    Ok(text) => {
                        let normalized = normalize_html(&text);
                        if normalized.is_empty() {
                            warn!(url = %candidate.url, "Candidate had no usable text");
                            return None;
                        }
                        debug!(
                            url = %candidate.url,
                            preview = %truncate_for_log(&normalized, 120),
                            "Candidate accepted"
                        );
                        Some((
                            normalized,
                            SourceInfo {
                                title: candidate.title,
                                url: candidate.url,
                            },
                        ))
                    }
                    Err(e) => {
                        let kind = SummaryError::from(e).kind();
                        warn!(url = %candidate.url, kind, "Candidate dropped");
                        None
                    }
                }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut corpus = Corpus::default();
        for (text, source) in fetched.into_iter().flatten() {
            corpus.documents.push(text);
            corpus.sources.push(source);
        }
        corpus
    }
}
