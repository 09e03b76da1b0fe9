//! # News Distill
//!
//! Command-line front end: summarize the coverage around one article.
//!
//! ```sh
//! NEWSAPI_KEY=... news_distill https://example.com/story -n 4
//! ```
//!
//! The summary is printed as JSON (or Markdown with `-f markdown`), or
//! written to the file given with `-o`.

use clap::Parser;
use news_distill::cli::Cli;
use news_distill::config::Config;
use news_distill::engine::DefaultSummarizer;
use news_distill::outputs;
use news_distill::utils::ensure_writable_dir;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_distill starting up");

    let args = Cli::parse();
    debug!(
        seed_url = %args.seed_url,
        format = ?args.format,
        output = ?args.output,
        "Parsed CLI arguments"
    );

    if let Err(e) = Url::parse(&args.seed_url) {
        error!(url = %args.seed_url, error = %e, "Seed URL is not a valid URL");
        return Err(e.into());
    }

    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);
    if config.search.api_key.is_none() {
        warn!("No NewsAPI key configured; summary will use the seed article only");
    }

    // Early check: the output file's directory must be writable
    if let Some(parent) = args.output.as_deref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            ensure_writable_dir(parent).await?;
        }
    }

    let sentences = config.summary.sentences;
    let lambda = config.summary.lambda;
    let engine = DefaultSummarizer::from_config(config)?;

    let response = match engine.summarize(&args.seed_url, sentences, lambda).await {
        Ok(response) => response,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Summarization failed");
            return Err(e.into());
        }
    };

    match &args.output {
        Some(path) => outputs::write(&response, args.format, path).await?,
        None => println!("{}", outputs::render(&response, args.format)?),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        sources = response.source_info.len(),
        "Execution complete"
    );
    Ok(())
}
