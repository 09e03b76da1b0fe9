//! External article-search provider.
//!
//! The collector only depends on the [`SearchProvider`] trait; the
//! production implementation is [`NewsApiClient`], which queries the
//! NewsAPI `/everything` endpoint.
//!
//! # Request shape
//!
//! | Parameter | Source |
//! |-----------|--------|
//! | `q` | keywords derived from the seed article |
//! | `from` | today minus the recency window |
//! | `language`, `sortBy`, `pageSize` | [`SearchConfig`] |

use crate::config::{FetchConfig, SearchConfig};
use crate::error::SearchError;
use crate::models::SearchResult;
use crate::scrapers::text::clean_title;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// One bounded search for related coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    /// Earliest publication date to include.
    pub from: NaiveDate,
    pub language: String,
    pub sort_by: String,
    pub page_size: usize,
}

impl SearchRequest {
    /// Build a request covering the configured recency window ending at `now`.
    pub fn recent(query: &str, config: &SearchConfig, now: DateTime<Utc>) -> Self {
        Self {
            query: query.to_string(),
            from: (now - chrono::Duration::days(config.recency_days)).date_naive(),
            language: config.language.clone(),
            sort_by: config.sort_by.clone(),
            page_size: config.page_size,
        }
    }
}

/// Anything that can answer a [`SearchRequest`] with candidate articles.
pub trait SearchProvider {
    /// Candidates in provider order, or why the search failed.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, SearchError>;
}

/// NewsAPI client.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(search: &SearchConfig, fetch: &FetchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(fetch.timeout())
            .user_agent(fetch.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            base_url: search.base_url.trim_end_matches('/').to_string(),
            api_key: search.api_key.clone(),
        })
    }
}

impl SearchProvider for NewsApiClient {
    #[instrument(level = "info", skip_all, fields(query = %request.query))]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingApiKey)?;
        let t0 = Instant::now();
        let from = request.from.format("%Y-%m-%d").to_string();
        let page_size = request.page_size.to_string();

        let response = self
            .client
            .get(format!("{}/everything", self.base_url))
            .query(&[
                ("q", request.query.as_str()),
                ("from", from.as_str()),
                ("language", request.language.as_str()),
                ("sortBy", request.sort_by.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        if !status.is_success() {
            error!(status = status.as_u16(), elapsed_ms, "Search provider returned an error status");
            return Err(match provider_message(&body) {
                Some(message) => SearchError::Provider(message),
                None => SearchError::Status(status.as_u16()),
            });
        }

        let results = parse_response(&body)?;
        info!(count = results.len(), elapsed_ms, "Search completed");
        Ok(results)
    }
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    url: Option<String>,
    title: Option<String>,
    #[serde(default)]
    source: NewsApiSource,
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<NewsApiResponse>(body)
        .ok()
        .and_then(|r| r.message)
}

/// Decode a NewsAPI response body into search results.
///
/// A payload whose `status` is not `"ok"` is a provider error. Entries
/// without a URL are skipped; titles have source attribution removed.
pub fn parse_response(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let response: NewsApiResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Provider(format!("malformed response: {e}")))?;

    if response.status != "ok" {
        let message = response.message.unwrap_or_else(|| "unknown error".to_string());
        warn!(status = %response.status, %message, "Search provider reported failure");
        return Err(SearchError::Provider(message));
    }

    let results = response
        .articles
        .into_iter()
        .filter_map(|article| {
            let url = article.url.filter(|u| !u.is_empty())?;
            let source = article.source.name.unwrap_or_default();
            let title = clean_title(article.title.as_deref().unwrap_or_default(), &source);
            let published_at = article.published_at.as_deref().and_then(|raw| {
                DateTime::parse_from_rfc3339(raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| debug!(%raw, error = %e, "Unparseable publishedAt"))
                    .ok()
            });
            Some(SearchResult {
                url,
                title,
                source,
                published_at,
            })
        })
        .collect();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"{
        "status": "ok",
        "totalResults": 3,
        "articles": [
            {
                "source": {"id": null, "name": "Coast Herald"},
                "title": "Storm batters coast - Coast Herald",
                "url": "https://herald.test/storm",
                "publishedAt": "2025-05-06T14:30:00Z"
            },
            {
                "source": {"id": null, "name": "Wire"},
                "title": "Crews restore power",
                "url": null,
                "publishedAt": "2025-05-06T15:00:00Z"
            },
            {
                "source": {"name": "Daily"},
                "title": "Evacuations lifted Daily",
                "url": "https://daily.test/evac",
                "publishedAt": "yesterday"
            }
        ]
    }"#;

    #[test]
    fn test_parse_response() {
        let results = parse_response(SAMPLE).unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].url, "https://herald.test/storm");
        assert_eq!(results[0].title, "Storm batters coast");
        assert_eq!(results[0].source, "Coast Herald");
        assert_eq!(
            results[0].published_at,
            Some(Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap())
        );

        assert_eq!(results[1].title, "Evacuations lifted");
        assert_eq!(results[1].published_at, None);
    }

    #[test]
    fn test_parse_error_status() {
        let body = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;
        match parse_response(body) {
            Err(SearchError::Provider(message)) => assert_eq!(message, "Your API key is invalid."),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(provider_message(body).as_deref(), Some("Your API key is invalid."));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(parse_response("<html>"), Err(SearchError::Provider(_))));
    }

    #[test]
    fn test_recent_request_window() {
        let config = SearchConfig::default();
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 1, 0, 0).unwrap();
        let request = SearchRequest::recent("storm coast", &config, now);
        assert_eq!(request.from, NaiveDate::from_ymd_opt(2025, 5, 4).unwrap());
        assert_eq!(request.page_size, 5);
        assert_eq!(request.language, "en");
        assert_eq!(request.sort_by, "relevancy");
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = NewsApiClient::new(&SearchConfig::default(), &FetchConfig::default()).unwrap();
        let request = SearchRequest::recent("storm", &SearchConfig::default(), Utc::now());
        assert!(matches!(client.search(&request).await, Err(SearchError::MissingApiKey)));
    }
}
