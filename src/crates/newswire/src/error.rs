//! Error types for news retrieval.

use thiserror::Error;

/// Result type for news operations.
pub type Result<T> = std::result::Result<T, NewsError>;

/// Errors that can occur when searching or scraping news.
#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API key not found in environment.
    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    /// API authentication failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Search API returned a non-success status.
    #[error("search API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Batch execution failed.
    #[error("Batch execution failed: {0}")]
    Pool(#[from] taskpool::PoolError),
}
