//! Serper news-search client.
//!
//! Thin wrapper over the Serper `/news` endpoint plus the composition
//! that fans scraping out over the result URLs.

use crate::error::{NewsError, Result};
use crate::scrape::PageFetcher;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use taskpool::{run_concurrently, wrap_with_retry, RetryPolicy, TaskBatch};

/// Environment variable holding the Serper API key.
pub const SERPER_API_KEY_ENV: &str = "SERPER_API_KEY";

const DEFAULT_ENDPOINT: &str = "https://google.serper.dev/news";

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Configuration for the Serper client.
#[derive(Debug, Clone)]
pub struct SerperConfig {
    /// API key sent in the `X-API-KEY` header.
    pub api_key: String,

    /// Endpoint URL for news search.
    pub endpoint: String,

    /// Request timeout duration.
    pub timeout: Duration,
}

impl SerperConfig {
    /// Create a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: default_timeout(),
        }
    }

    /// Create configuration from the environment, honouring a `.env` file.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var(SERPER_API_KEY_ENV).map_err(|_| {
            NewsError::ApiKeyNotFound(format!("Environment variable: {}", SERPER_API_KEY_ENV))
        })?;

        Ok(Self::new(api_key))
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parameters for one news search.
#[derive(Debug, Clone, Serialize)]
pub struct NewsQuery {
    /// Search terms.
    pub q: String,

    /// Geography code, e.g. "us".
    pub gl: String,

    /// Language code, e.g. "en".
    pub hl: String,

    /// Maximum number of results.
    pub num: u32,

    /// Time window filter; "qdr:d" restricts to the past day.
    pub tbs: String,
}

impl NewsQuery {
    /// Create a query with the default region, language, result count and
    /// past-day window.
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            gl: "us".to_string(),
            hl: "en".to_string(),
            num: 10,
            tbs: "qdr:d".to_string(),
        }
    }

    /// Set the geography code.
    pub fn with_region(mut self, gl: impl Into<String>) -> Self {
        self.gl = gl.into();
        self
    }

    /// Set the language code.
    pub fn with_language(mut self, hl: impl Into<String>) -> Self {
        self.hl = hl.into();
        self
    }

    /// Set the maximum number of results.
    pub fn with_count(mut self, num: u32) -> Self {
        self.num = num;
        self
    }

    /// Set the time window filter.
    pub fn with_window(mut self, tbs: impl Into<String>) -> Self {
        self.tbs = tbs.into();
        self
    }
}

/// One news search result, optionally carrying scraped page text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    /// Headline.
    pub title: String,

    /// Article URL.
    pub link: String,

    /// Short result snippet.
    #[serde(default)]
    pub snippet: Option<String>,

    /// Publication date as reported by the search API.
    #[serde(default)]
    pub date: Option<String>,

    /// Publishing outlet.
    #[serde(default)]
    pub source: Option<String>,

    /// Thumbnail URL.
    #[serde(default)]
    pub image_url: Option<String>,

    /// Result rank.
    #[serde(default)]
    pub position: Option<u32>,

    /// Scraped page text; empty when the page could not be fetched.
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    news: Vec<NewsArticle>,
}

/// Client for the Serper news-search API.
#[derive(Debug, Clone)]
pub struct SerperClient {
    config: SerperConfig,
    client: Client,
}

impl SerperClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SerperConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Search recent news for `query`.
    pub async fn search_news(&self, query: &NewsQuery) -> Result<Vec<NewsArticle>> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("X-API-KEY", self.config.api_key.as_str())
            .json(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => NewsError::Authentication(body),
                _ => NewsError::Api {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let parsed: SerperResponse = response
            .json()
            .await
            .map_err(|e| NewsError::InvalidResponse(e.to_string()))?;

        Ok(parsed.news)
    }
}

/// Search news and fill each article's `content` from its page.
///
/// Page fetches are wrapped in retry (3 attempts, empty-string fallback)
/// and mapped over the result URLs with the default worker bound, so the
/// returned list always matches the search results one-to-one; articles
/// whose pages stayed unreachable carry empty content.
pub async fn search_and_scrape(
    client: &SerperClient,
    fetcher: &PageFetcher,
    query: &NewsQuery,
) -> Result<Vec<NewsArticle>> {
    let mut articles = client.search_news(query).await?;
    tracing::info!(query = %query.q, results = articles.len(), "news search complete");
    if articles.is_empty() {
        return Ok(articles);
    }

    let urls: Vec<String> = articles.iter().map(|article| article.link.clone()).collect();

    let fetcher = fetcher.clone();
    let scrape = wrap_with_retry(
        "scrape_url",
        RetryPolicy::new(3),
        String::new(),
        move |url: String| {
            let fetcher = fetcher.clone();
            async move { fetcher.fetch_text(&url).await }
        },
    );

    let contents = run_concurrently(
        scrape,
        TaskBatch::new(urls).with_label("scraping articles"),
    )
    .await?;

    for (article, content) in articles.iter_mut().zip(contents) {
        article.content = content;
    }

    Ok(articles)
}
