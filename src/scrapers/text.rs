//! Pure text utilities applied to scraped content and provider metadata.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Elements whose text is never reader-visible content.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Remove attribution boilerplate that search providers append to titles.
///
/// `"Storm hits coast - Example News"` becomes `"Storm hits coast"`. If the
/// source name is still at the end after that, it is removed too.
///
/// # Examples
///
/// ```
/// use news_distill::scrapers::text::clean_title;
///
/// assert_eq!(clean_title("Storm hits coast - Example News", "Example News"), "Storm hits coast");
/// assert_eq!(clean_title("Markets rally Reuters", "Reuters"), "Markets rally");
/// ```
pub fn clean_title(raw_title: &str, source_name: &str) -> String {
    if raw_title.is_empty() {
        return String::new();
    }
    let mut cleaned = match raw_title.rsplit_once(" - ") {
        Some((head, _)) => head,
        None => raw_title,
    };
    if !source_name.is_empty() {
        if let Some(head) = cleaned.strip_suffix(source_name) {
            cleaned = head.trim();
        }
    }
    cleaned.trim().to_string()
}

/// Turn markup (or already-plain text) into the canonical clean-text form.
///
/// Tags are stripped, each line has its whitespace runs collapsed to one
/// space, blank lines are dropped and the surviving lines are joined with a
/// blank line between them.
pub fn normalize_html(raw_markup: &str) -> String {
    let fragment = Html::parse_fragment(raw_markup);

    let mut text = String::new();
    for node in fragment.tree.root().descendants() {
        let Node::Text(t) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| INVISIBLE_ELEMENTS.contains(&e.name()))
        });
        if hidden {
            continue;
        }
        text.push_str(t);
        text.push('\n');
    }

    text.lines()
        .map(|line| WHITESPACE_RUN.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Collapse every whitespace run in `s` to a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").trim().to_string()
}
