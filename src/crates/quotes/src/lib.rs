//! Daily stock quotes for the tickerwire workspace.
//!
//! Fetches per-symbol OHLCV data from a chart API, ranks a symbol
//! universe by intraday change and renders the winner's recent history.
//! Quote fetches are wrapped in retry with an omission fallback and
//! fanned out over a bounded worker pool; a symbol that stays
//! unreachable drops out of the ranking instead of failing the run.
//!
//! # Example
//!
//! ```rust,ignore
//! use quotes::{load_symbols, top_performer, QuoteClient, QuoteConfig};
//!
//! let client = QuoteClient::new(QuoteConfig::new());
//! let symbols = load_symbols("data/Nasdaq-100.csv")?;
//!
//! let report = top_performer(&client, symbols, 5, "data").await?;
//! println!("{} ({:+.2}%)", report.symbol, report.percent_change);
//! println!("{}", report.sample_markdown);
//! ```

pub mod client;
pub mod error;
pub mod report;

pub use client::{DailyBar, DailyChange, QuoteClient, QuoteConfig};
pub use error::{QuoteError, Result};
pub use report::{load_symbols, markdown_table, top_performer, write_csv, TopPerformer};
