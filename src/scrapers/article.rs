//! Article retrieval and body-text extraction.
//!
//! Pages are fetched through a [`PageSource`] (real HTTP in production, a stub
//! in tests), then reduced to paragraph text by trying an ordered list of
//! [`ExtractionStrategy`] scopes. Extracted text is memoized in a
//! [`ContentCache`] keyed by URL.

use crate::cache::ContentCache;
use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::models::ArticleDocument;
use crate::scrapers::text::collapse_whitespace;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Elements that never hold article body text.
const NON_CONTENT_ELEMENTS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "iframe", "noscript",
];

/// Source of raw page markup.
pub trait PageSource {
    /// Retrieve the markup at `url`, or the reason it could not be retrieved.
    async fn get_html(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageSource`] backed by `reqwest` with a bounded timeout and a browser
/// user agent.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    #[instrument(level = "debug", skip(self))]
    async fn get_html(&self, url: &str) -> Result<String, FetchError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

/// A named scope in which to look for paragraphs.
#[derive(Debug)]
pub struct ExtractionStrategy {
    pub name: &'static str,
    selector: Selector,
}

impl ExtractionStrategy {
    fn new(name: &'static str, css: &str) -> Self {
        Self {
            name,
            selector: Selector::parse(css).expect("valid extraction selector"),
        }
    }

    /// First matching scope outside non-content regions.
    fn scope<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document
            .select(&self.selector)
            .find(|el| !inside_non_content(el))
    }
}

/// Scopes tried in order; the whole document is the final fallback.
static STRATEGIES: Lazy<Vec<ExtractionStrategy>> = Lazy::new(|| {
    vec![
        ExtractionStrategy::new("semantic_article", "article"),
        ExtractionStrategy::new(
            "content_class",
            "div.article-content, div.post-content, div.entry-content, div.content, div.article-body",
        ),
        ExtractionStrategy::new("content_id", "div#article, div#content, div#main-content"),
    ]
});

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));

fn inside_non_content(el: &ElementRef<'_>) -> bool {
    NON_CONTENT_ELEMENTS.contains(&el.value().name())
        || el.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| NON_CONTENT_ELEMENTS.contains(&e.name()))
        })
}

fn paragraphs_in(scope: ElementRef<'_>) -> Vec<String> {
    scope
        .select(&PARAGRAPH)
        .filter(|p| !inside_non_content(p))
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Extract article body text from a full HTML page.
///
/// Returns the non-empty paragraphs of the first strategy scope that has
/// any, joined by newlines. An empty string means the page had no paragraph
/// text at all.
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    for strategy in STRATEGIES.iter() {
        let Some(scope) = strategy.scope(&document) else {
            continue;
        };
        let paragraphs = paragraphs_in(scope);
        if !paragraphs.is_empty() {
            debug!(strategy = strategy.name, count = paragraphs.len(), "Extracted paragraphs");
            return paragraphs.join("\n");
        }
    }

    let paragraphs = paragraphs_in(document.root_element());
    debug!(strategy = "whole_document", count = paragraphs.len(), "Extracted paragraphs");
    paragraphs.join("\n")
}

/// Fetches article text, consulting the cache first.
///
/// Cache failures are logged and otherwise ignored; the fetcher behaves the
/// same with the cache disabled.
#[derive(Debug)]
pub struct ArticleFetcher<P, C> {
    pages: P,
    cache: C,
    ttl: Duration,
    use_cache: bool,
}

impl<P, C> ArticleFetcher<P, C>
where
    P: PageSource,
    C: ContentCache,
{
    pub fn new(pages: P, cache: C, ttl: Duration) -> Self {
        Self {
            pages,
            cache,
            ttl,
            use_cache: true,
        }
    }

    /// Bypass the cache for both reads and writes.
    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    #[cfg(test)]
    pub(crate) fn pages(&self) -> &P {
        &self.pages
    }

    /// Fetch `url` and return its article text.
    ///
    /// `Ok("")` means the page loaded but no paragraphs were found. Only
    /// non-empty text is written to the cache.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if self.use_cache {
            match self.cache.get(url).await {
                Ok(Some(text)) => {
                    info!(bytes = text.len(), "Cache hit");
                    return Ok(text);
                }
                Ok(None) => debug!("Cache miss"),
                Err(e) => error!(error = %e, "Cache read failed; fetching"),
            }
        }

        let t0 = Instant::now();
        let html = match self.pages.get_html(url).await {
            Ok(html) => html,
            Err(FetchError::Timeout) => {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u64, "Timed out fetching article");
                return Err(FetchError::Timeout);
            }
            Err(e) => {
                error!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "Error fetching article");
                return Err(e);
            }
        };

        let text = extract_article_text(&html);
        info!(
            bytes = text.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Scraped article"
        );

        if !text.is_empty() && self.use_cache {
            match self.cache.put(url, &text, self.ttl).await {
                Ok(()) => debug!("Cached article"),
                Err(e) => error!(error = %e, "Cache write failed"),
            }
        }
        Ok(text)
    }

    /// Fetch `url` into an [`ArticleDocument`], folding failures into an
    /// absent `raw_text`.
    pub async fn fetch_document(&self, url: &str, title: &str) -> ArticleDocument {
        let raw_text = match self.fetch(url).await {
            Ok(text) => {
                if text.is_empty() {
                    warn!(%url, "Fetch succeeded but no paragraph text was found");
                }
                Some(text)
            }
            Err(e) => {
                warn!(%url, error = %e, "Fetch failed; document has no text");
                None
            }
        };
        ArticleDocument {
            url: url.to_string(),
            title: title.to_string(),
            raw_text,
        }
    }
}
