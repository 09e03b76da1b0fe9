//! In-memory stand-ins for the network and the clock, shared by unit tests.

use crate::api::{SearchProvider, SearchRequest};
use crate::cache::{Clock, ContentCache};
use crate::error::{CacheError, FetchError, SearchError};
use crate::models::SearchResult;
use crate::scrapers::article::PageSource;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Canned pages keyed by URL; unknown URLs fail with a transport error.
#[derive(Debug, Default)]
pub struct StubPages {
    pages: HashMap<String, Result<String, FetchError>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StubPages {
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(html.to_string()));
        self
    }

    pub fn with_failure(mut self, url: &str, error: FetchError) -> Self {
        self.pages.insert(url.to_string(), Err(error));
        self
    }

    /// How many times `url` was requested.
    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

impl PageSource for StubPages {
    async fn get_html(&self, url: &str) -> Result<String, FetchError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
        self.pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Transport(format!("no stub for {url}"))))
    }
}

/// Search provider returning a fixed answer.
#[derive(Debug)]
pub struct StubSearch {
    results: Option<Vec<SearchResult>>,
    error: Mutex<Option<SearchError>>,
}

impl StubSearch {
    pub fn returning(results: Vec<SearchResult>) -> Self {
        Self {
            results: Some(results),
            error: Mutex::new(None),
        }
    }

    /// Fails the first search with `error`, then returns no results.
    pub fn failing(error: SearchError) -> Self {
        Self {
            results: None,
            error: Mutex::new(Some(error)),
        }
    }
}

impl SearchProvider for StubSearch {
    async fn search(&self, _request: &SearchRequest) -> Result<Vec<SearchResult>, SearchError> {
        if let Some(error) = self.error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.results.clone().unwrap_or_default())
    }
}

pub fn result(url: &str, title: &str) -> SearchResult {
    SearchResult {
        url: url.to_string(),
        title: title.to_string(),
        source: "Stub Wire".to_string(),
        published_at: None,
    }
}

/// A minimal article page with one `<p>` per paragraph.
pub fn article_html(paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>\n")).collect();
    format!(
        "<html><head><title>Stub</title><script>track();</script></head><body>\
         <nav><p>Home | World | Sport</p></nav>\
         <article>\n{body}</article>\
         <footer><p>All rights reserved.</p></footer></body></html>"
    )
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2025, 5, 6, 12, 0, 0).unwrap()),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Cache whose backing store is always unreachable.
#[derive(Debug)]
pub struct BrokenCache;

impl ContentCache for BrokenCache {
    async fn get(&self, _url: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn put(&self, _url: &str, _content: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}
