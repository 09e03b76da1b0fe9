//! The summarization entry point.
//!
//! A [`NewsSummarizer`] owns the long-lived pieces (fetcher with its cache,
//! search provider, language resources) and runs one independent pipeline per
//! [`NewsSummarizer::summarize`] call:
//!
//! 1. **Collect**: seed article plus related coverage ([`RelatedCollector`])
//! 2. **Summarize**: configured strategy over the corpus ([`SummaryMethod`])

use crate::api::{NewsApiClient, SearchProvider};
use crate::cache::{CacheBackend, ContentCache};
use crate::collector::RelatedCollector;
use crate::config::Config;
use crate::error::{FetchError, SearchError, SummaryError};
use crate::models::SummaryResponse;
use crate::nlp::Nlp;
use crate::scrapers::article::{ArticleFetcher, HttpPageSource, PageSource};
use crate::summarizer::{Summarize, SummaryMethod};
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, instrument};

/// Failure to construct the production engine.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("could not build HTTP client: {0}")]
    Fetch(#[from] FetchError),

    #[error("could not build search client: {0}")]
    Search(#[from] SearchError),
}

#[derive(Debug)]
pub struct NewsSummarizer<P, C, S> {
    fetcher: ArticleFetcher<P, C>,
    search: S,
    nlp: &'static Nlp,
    config: Config,
}

/// Engine wired to real HTTP, NewsAPI and the configured cache backend.
pub type DefaultSummarizer = NewsSummarizer<HttpPageSource, CacheBackend, NewsApiClient>;

impl DefaultSummarizer {
    pub fn from_config(config: Config) -> Result<Self, SetupError> {
        let pages = HttpPageSource::new(&config.fetch)?;
        let search = NewsApiClient::new(&config.search, &config.fetch)?;
        let cache = CacheBackend::from_config(&config.cache);
        let fetcher = ArticleFetcher::new(pages, cache, config.cache.ttl());
        Ok(NewsSummarizer::new(fetcher, search, Nlp::init(), config))
    }
}

impl<P, C, S> NewsSummarizer<P, C, S>
where
    P: PageSource,
    C: ContentCache,
    S: SearchProvider,
{
    pub fn new(fetcher: ArticleFetcher<P, C>, search: S, nlp: &'static Nlp, config: Config) -> Self {
        Self {
            fetcher,
            search,
            nlp,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Summarize the coverage around `seed_url` in `target_sentence_count`
    /// sentences, trading relevance against diversity with `lambda`.
    #[instrument(level = "info", skip(self))]
    pub async fn summarize(
        &self,
        seed_url: &str,
        target_sentence_count: usize,
        lambda: f64,
    ) -> Result<SummaryResponse, SummaryError> {
        let t0 = Instant::now();

        let collector = RelatedCollector::new(
            &self.fetcher,
            &self.search,
            self.nlp,
            &self.config.search,
            self.config.fetch.max_concurrent,
        );
        let collection = collector.collect(seed_url).await?;
        if collection.corpus.is_empty() {
            error!("Collector returned an empty corpus");
            return Err(SummaryError::EmptyCorpus);
        }

        let method = SummaryMethod::from_config(&self.config.summary, lambda);
        let summary_text = method.summarize(
            self.nlp,
            &collection.corpus,
            &collection.query,
            target_sentence_count,
        )?;

        info!(
            documents = collection.corpus.len(),
            bytes = summary_text.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Summary complete"
        );
        Ok(SummaryResponse {
            summary_text,
            source_info: collection.corpus.sources,
            query: collection.query,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::Strategy;
    use crate::error::SearchError;
    use crate::testing::{StubPages, StubSearch, article_html, result};
    use std::time::Duration;

    const SEED: &str = "https://seed.test/harbor-flood";

    /// Roughly 200 words of readable body text.
    const SEED_PARAGRAPHS: &[&str] = &[
        "Heavy flooding swept through the harbor district on Monday night, closing the main \
         coastal road and forcing dozens of families to leave their homes before dawn.",
        "City officials said the harbor seawall failed in two places after a week of steady \
         rain, and engineers were sent to inspect the damage as soon as the water began to fall.",
        "Volunteers filled sandbags outside the community center while the fire department used \
         boats to reach residents stranded on the lower streets near the fishing docks.",
        "The mayor told reporters that the flooding was the worst the harbor had seen in twenty \
         years and promised that repairs to the seawall would begin within the month.",
        "Forecasters warned that another storm could bring more rain to the coast later this \
         week, and residents were urged to keep emergency supplies ready and follow official alerts.",
    ];

    fn summarizer(pages: StubPages, search: StubSearch) -> NewsSummarizer<StubPages, CacheBackend, StubSearch> {
        let cache = CacheBackend::Memory(MemoryCache::new());
        let fetcher = ArticleFetcher::new(pages, cache, Duration::from_secs(24 * 60 * 60));
        NewsSummarizer::new(fetcher, search, Nlp::init(), Config::default())
    }

    #[tokio::test]
    async fn test_end_to_end_with_two_candidates() {
        let pages = StubPages::default()
            .with_page(SEED, &article_html(SEED_PARAGRAPHS))
            .with_page(
                "https://a.test/seawall",
                &article_html(&[
                    "Engineers inspected the broken harbor seawall on Tuesday.",
                    "They said temporary barriers would hold back the flooding for now.",
                ]),
            )
            .with_page(
                "https://b.test/shelter",
                &article_html(&[
                    "Families displaced by the harbor flooding stayed at the community center.",
                    "Donations of food and blankets arrived throughout the day.",
                ]),
            );
        let search = StubSearch::returning(vec![
            result("https://a.test/seawall", "Seawall inspected"),
            result("https://b.test/shelter", "Families sheltered"),
        ]);

        let engine = summarizer(pages, search);
        let response = engine.summarize(SEED, 3, 0.5).await.unwrap();

        assert_eq!(response.source_info.len(), 2);
        assert_eq!(response.source_info[0].title, "Seawall inspected");
        assert!(response.query.contains("harbor"));

        let nlp = Nlp::init();
        let summary_sentences = nlp.sentences(&response.summary_text);
        assert_eq!(summary_sentences.len(), 3);
        assert!(summary_sentences.iter().all(|s| !s.is_empty()));
    }

    #[tokio::test]
    async fn test_end_to_end_corpus_shape() {
        let pages = StubPages::default()
            .with_page(SEED, &article_html(SEED_PARAGRAPHS))
            .with_page("https://a.test/1", &article_html(&["Harbor repairs start soon. Crews are ready."]))
            .with_page("https://b.test/2", &article_html(&["Rain returns to the harbor. Residents prepare."]));
        let search = StubSearch::returning(vec![
            result("https://a.test/1", "Repairs"),
            result("https://b.test/2", "Rain"),
        ]);
        let engine = summarizer(pages, search);

        let collection = RelatedCollector::new(
            &engine.fetcher,
            &engine.search,
            engine.nlp,
            &engine.config.search,
            engine.config.fetch.max_concurrent,
        )
        .collect(SEED)
        .await
        .unwrap();
        assert_eq!(collection.corpus.len(), 3);

        let space = crate::vectorize::build(engine.nlp, &collection.corpus, &collection.query).unwrap();
        assert!(space.sentences.len() >= 6);
        let picked = crate::mmr::select(&space.sentence_vectors, &space.query_vector, 3, 0.5);
        assert_eq!(picked.len(), 3);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
        assert!(picked.iter().all(|&i| !space.sentences[i].is_empty()));
    }

    #[tokio::test]
    async fn test_seed_timeout_is_no_extractable_content() {
        let pages = StubPages::default().with_failure(SEED, FetchError::Timeout);
        let engine = summarizer(pages, StubSearch::returning(vec![]));
        let err = engine.summarize(SEED, 3, 0.5).await.unwrap_err();
        assert_eq!(err.kind(), "no_extractable_content");
    }

    #[tokio::test]
    async fn test_provider_error_still_summarizes_seed() {
        let pages = StubPages::default().with_page(SEED, &article_html(SEED_PARAGRAPHS));
        let engine = summarizer(pages, StubSearch::failing(SearchError::Timeout));
        let response = engine.summarize(SEED, 2, 0.7).await.unwrap();
        assert!(response.source_info.is_empty());
        assert_eq!(Nlp::init().sentences(&response.summary_text).len(), 2);
    }

    #[tokio::test]
    async fn test_seed_is_cached_across_requests() {
        let pages = StubPages::default().with_page(SEED, &article_html(SEED_PARAGRAPHS));
        let engine = summarizer(pages, StubSearch::returning(vec![]));
        engine.summarize(SEED, 2, 0.5).await.unwrap();
        engine.summarize(SEED, 4, 0.5).await.unwrap();
        assert_eq!(engine.fetcher.pages().calls(SEED), 1);
    }

    #[tokio::test]
    async fn test_keyword_overlap_strategy() {
        let pages = StubPages::default().with_page(SEED, &article_html(SEED_PARAGRAPHS));
        let mut engine = summarizer(pages, StubSearch::returning(vec![]));
        engine.config.summary.strategy = Strategy::KeywordOverlap;
        let response = engine.summarize(SEED, 2, 0.5).await.unwrap();
        assert!(response.summary_text.contains("harbor"));
    }
}
