//! Rendering and writing a finished summary.
//!
//! - [`json`]: the [`SummaryResponse`](crate::models::SummaryResponse) as pretty JSON
//! - [`markdown`]: a short readable report with source links

pub mod json;
pub mod markdown;

use crate::models::SummaryResponse;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
}

/// Render `response` in `format`.
pub fn render(response: &SummaryResponse, format: OutputFormat) -> Result<String, Box<dyn Error>> {
    match format {
        OutputFormat::Json => Ok(json::to_json(response)?),
        OutputFormat::Markdown => Ok(markdown::to_markdown(response)),
    }
}

/// Render `response` and write it to `path`, replacing any existing file.
#[instrument(level = "info", skip(response))]
pub async fn write(
    response: &SummaryResponse,
    format: OutputFormat,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let rendered = render(response, format)?;
    fs::write(path, rendered).await?;
    info!(path = %path.display(), "Wrote summary");
    Ok(())
}
