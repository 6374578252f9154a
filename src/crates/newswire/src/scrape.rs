//! Article page fetching and plain-text extraction.

use crate::error::Result;
use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;

/// Per-page request timeout.
const PAGE_TIMEOUT: Duration = Duration::from_secs(15);

static SCRIPT_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)>").unwrap()
});
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());
static HORIZONTAL_WS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static LINE_BREAK_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\n\s+").unwrap());

/// Fetches article pages and reduces them to readable text.
///
/// Requests carry a browser-like header set; some news sites refuse the
/// default `reqwest` user agent outright.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Create a fetcher with a 15-second timeout per page.
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36",
            ),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://www.google.com/"),
        );
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(
            "upgrade-insecure-requests",
            HeaderValue::from_static("1"),
        );

        let client = Client::builder()
            .timeout(PAGE_TIMEOUT)
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch a page and return its readable text.
    ///
    /// Non-success statuses and timeouts surface as errors so that the
    /// retry wrapper can treat them like any other transient failure.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;
        Ok(html_to_text(&html))
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce an HTML document to plain text.
///
/// Drops script/style/noscript blocks, strips the remaining tags, decodes
/// the most common entities, collapses horizontal whitespace and squeezes
/// blank-line runs into single newlines.
pub fn html_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK_REGEX.replace_all(html, " ");
    let without_tags = TAG_REGEX.replace_all(&without_scripts, " ");

    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let collapsed = HORIZONTAL_WS_REGEX.replace_all(&decoded, " ");
    let squeezed = LINE_BREAK_RUN_REGEX.replace_all(&collapsed, "\n");
    squeezed.trim().to_string()
}
