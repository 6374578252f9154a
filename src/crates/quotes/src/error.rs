//! Error types for quote retrieval and reporting.

use thiserror::Error;

/// Result type for quote operations.
pub type Result<T> = std::result::Result<T, QuoteError>;

/// Errors that can occur when fetching quotes or building reports.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Chart API returned a non-success status.
    #[error("quote API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The chart carried no usable data for a symbol.
    #[error("no chart data for symbol: {0}")]
    NoData(String),

    /// Every symbol in the batch fell back to the omission sentinel.
    #[error("no symbol produced a usable quote")]
    NoUsableQuotes,

    /// The symbol universe file was missing or malformed.
    #[error("symbol file error: {0}")]
    SymbolFile(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Batch execution failed.
    #[error("Batch execution failed: {0}")]
    Pool(#[from] taskpool::PoolError),
}
