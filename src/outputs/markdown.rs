//! Markdown rendering of a summary response.

use crate::models::SummaryResponse;
use std::fmt::Write;

/// Render the summary as a small Markdown document.
///
/// ```text
/// # Summary
///
/// <summary text>
///
/// _Query: flooding harbor_
///
/// ## Sources
///
/// - [Title](https://...)
/// ```
///
/// The sources section is omitted when the summary came from the seed alone.
pub fn to_markdown(response: &SummaryResponse) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# Summary\n");
    let _ = writeln!(md, "{}\n", response.summary_text);
    if !response.query.is_empty() {
        let _ = writeln!(md, "_Query: {}_\n", response.query);
    }
    if !response.source_info.is_empty() {
        let _ = writeln!(md, "## Sources\n");
        for source in &response.source_info {
            let title = if source.title.is_empty() { source.url.as_str() } else { source.title.as_str() };
            let _ = writeln!(md, "- [{}]({})", title, source.url);
        }
    }
    md
}
