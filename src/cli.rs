//! Command-line interface definitions for News Distill.
//!
//! Flags override values from the optional YAML config file. The search
//! provider key can also come from the `NEWSAPI_KEY` environment variable.

use crate::config::{CacheBackendKind, Config, Strategy, clamp_lambda};
use crate::outputs::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Summarize the news coverage around one article.
///
/// # Examples
///
/// ```sh
/// # Five-sentence summary as JSON
/// news_distill https://example.com/story
///
/// # Three sentences, favouring diversity, as Markdown written to a file
/// news_distill https://example.com/story -n 3 --lambda 0.3 -f markdown -o summary.md
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URL of the seed article
    pub seed_url: String,

    /// Number of sentences in the summary
    #[arg(short = 'n', long)]
    pub sentences: Option<usize>,

    /// Relevance weight in [0, 1]; lower values favour diversity
    #[arg(short, long)]
    pub lambda: Option<f64>,

    /// Summary method
    #[arg(short, long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Disable the article cache
    #[arg(long)]
    pub no_cache: bool,

    /// Use a disk cache in this directory
    #[arg(long)]
    pub cache_dir: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write the summary to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(n) = self.sentences {
            config.summary.sentences = n;
        }
        if let Some(lambda) = self.lambda {
            config.summary.lambda = clamp_lambda(lambda);
        }
        if let Some(strategy) = self.strategy {
            config.summary.strategy = strategy;
        }
        if let Some(key) = &self.api_key {
            config.search.api_key = Some(key.clone());
        }
        if let Some(dir) = &self.cache_dir {
            config.cache.backend = CacheBackendKind::Disk;
            config.cache.dir = dir.clone();
        }
        if self.no_cache {
            config.cache.backend = CacheBackendKind::Disabled;
        }
    }
}
