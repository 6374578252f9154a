//! News retrieval for the tickerwire workspace.
//!
//! Searches recent news through the Serper API and fills in article bodies
//! by scraping each result page. Scraping is wrapped in retry with an
//! empty-string fallback and fanned out over a bounded worker pool, so one
//! unreachable page never sinks the batch.
//!
//! # Example
//!
//! ```rust,ignore
//! use newswire::{search_and_scrape, NewsQuery, PageFetcher, SerperClient, SerperConfig};
//!
//! let client = SerperClient::new(SerperConfig::from_env()?);
//! let fetcher = PageFetcher::new();
//!
//! let articles = search_and_scrape(&client, &fetcher, &NewsQuery::new("Apple Stock News")).await?;
//! for article in &articles {
//!     println!("{}: {} chars", article.title, article.content.len());
//! }
//! ```

pub mod client;
pub mod error;
pub mod scrape;

pub use client::{search_and_scrape, NewsArticle, NewsQuery, SerperClient, SerperConfig};
pub use error::{NewsError, Result};
pub use scrape::{html_to_text, PageFetcher};
