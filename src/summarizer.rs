//! Extractive summary strategies.
//!
//! [`MmrSummarizer`] is the primary method. [`KeywordOverlapSummarizer`]
//! needs no vector space and is used whenever one cannot be built.

use crate::config::{Strategy, SummaryConfig, clamp_lambda};
use crate::error::SummaryError;
use crate::keywords::extract_keywords;
use crate::mmr::{join_selected, select};
use crate::models::Corpus;
use crate::nlp::Nlp;
use crate::vectorize::{build, segment};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// Produce an extractive summary of `corpus` of at most `target_count` sentences.
pub trait Summarize {
    fn summarize(
        &self,
        nlp: &Nlp,
        corpus: &Corpus,
        query: &str,
        target_count: usize,
    ) -> Result<String, SummaryError>;
}

/// TF-IDF + Maximal Marginal Relevance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MmrSummarizer {
    pub lambda: f64,
    /// Corpus keywords used by the fallback when the query is empty.
    pub fallback_keywords: usize,
}

impl Summarize for MmrSummarizer {
    #[instrument(level = "info", skip(self, nlp, corpus, query), fields(lambda = self.lambda))]
    fn summarize(
        &self,
        nlp: &Nlp,
        corpus: &Corpus,
        query: &str,
        target_count: usize,
    ) -> Result<String, SummaryError> {
        let space = match build(nlp, corpus, query) {
            Ok(space) => space,
            Err(SummaryError::VectorizationFailure(reason)) => {
                warn!(%reason, "Vectorization failed; using keyword-overlap summary");
                let fallback = KeywordOverlapSummarizer {
                    fallback_keywords: self.fallback_keywords,
                };
                return fallback.summarize(nlp, corpus, query, target_count);
            }
            Err(e) => return Err(e),
        };

        let picked = select(
            &space.sentence_vectors,
            &space.query_vector,
            target_count,
            clamp_lambda(self.lambda),
        );
        info!(sentences = space.sentences.len(), selected = picked.len(), "MMR summary built");
        Ok(join_selected(&space.sentences, &picked))
    }
}

/// Scores sentences by how many query keywords they contain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordOverlapSummarizer {
    pub fallback_keywords: usize,
}

impl Default for KeywordOverlapSummarizer {
    fn default() -> Self {
        Self {
            fallback_keywords: 10,
        }
    }
}

impl Summarize for KeywordOverlapSummarizer {
    #[instrument(level = "info", skip(self, nlp, corpus, query))]
    fn summarize(
        &self,
        nlp: &Nlp,
        corpus: &Corpus,
        query: &str,
        target_count: usize,
    ) -> Result<String, SummaryError> {
        let sentences = segment(nlp, corpus)?;

        let keywords: HashSet<String> = if query.trim().is_empty() {
            extract_keywords(nlp, &corpus.joined_text(), self.fallback_keywords)
                .into_iter()
                .collect()
        } else {
            query.split_whitespace().map(str::to_lowercase).collect()
        };

        let scores: Vec<usize> = sentences
            .iter()
            .map(|s| nlp.words(s).iter().filter(|w| keywords.contains(*w)).count())
            .collect();

        let mut picked: Vec<usize> = (0..sentences.len()).filter(|&i| scores[i] > 0).collect();
        if picked.is_empty() {
            picked = (0..sentences.len().min(target_count)).collect();
        } else {
            // Stable: equal scores keep reading order.
            picked.sort_by(|&a, &b| scores[b].cmp(&scores[a]));
            picked.truncate(target_count);
            picked.sort_unstable();
        }

        info!(sentences = sentences.len(), selected = picked.len(), "Keyword-overlap summary built");
        Ok(join_selected(&sentences, &picked))
    }
}

/// The configured strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SummaryMethod {
    Mmr(MmrSummarizer),
    KeywordOverlap(KeywordOverlapSummarizer),
}

impl SummaryMethod {
    /// Strategy from config, with `lambda` overriding the configured value.
    pub fn from_config(config: &SummaryConfig, lambda: f64) -> Self {
        match config.strategy {
            Strategy::Mmr => SummaryMethod::Mmr(MmrSummarizer {
                lambda: clamp_lambda(lambda),
                fallback_keywords: config.fallback_keywords,
            }),
            Strategy::KeywordOverlap => SummaryMethod::KeywordOverlap(KeywordOverlapSummarizer {
                fallback_keywords: config.fallback_keywords,
            }),
        }
    }
}

impl Summarize for SummaryMethod {
    fn summarize(
        &self,
        nlp: &Nlp,
        corpus: &Corpus,
        query: &str,
        target_count: usize,
    ) -> Result<String, SummaryError> {
        match self {
            SummaryMethod::Mmr(s) => s.summarize(nlp, corpus, query, target_count),
            SummaryMethod::KeywordOverlap(s) => s.summarize(nlp, corpus, query, target_count),
        }
    }
}
