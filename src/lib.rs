//! # News Distill
//!
//! Extractive summaries of the news coverage around one article.
//!
//! Given a seed article URL, the engine fetches and cleans the article,
//! derives a keyword query from it, gathers a handful of recent related
//! articles through a search provider, and selects a small set of
//! sentences that are relevant to the query but not redundant with each
//! other (Maximal Marginal Relevance over TF-IDF sentence vectors).
//!
//! ## Pipeline
//!
//! 1. **Fetch** ([`scrapers`], [`cache`]): URL to plain text, memoized for 24h
//! 2. **Query** ([`keywords`]): most frequent non-stopword terms of the seed
//! 3. **Collect** ([`collector`], [`api`]): seed plus related articles
//! 4. **Vectorize** ([`vectorize`]): sentence segmentation and TF-IDF
//! 5. **Select** ([`mmr`], [`summarizer`]): MMR, or keyword overlap as fallback
//!
//! [`engine::NewsSummarizer`] runs the whole pipeline.

pub mod api;
pub mod cache;
pub mod cli;
pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod keywords;
pub mod mmr;
pub mod models;
pub mod nlp;
pub mod outputs;
pub mod scrapers;
pub mod summarizer;
pub mod utils;
pub mod vectorize;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{DefaultSummarizer, NewsSummarizer};
pub use error::SummaryError;
pub use models::{SourceInfo, SummaryResponse};
pub use scrapers::text::{clean_title, normalize_html};
