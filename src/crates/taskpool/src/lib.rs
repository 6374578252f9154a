//! Concurrency utilities for latency-bound, fallible operations.
//!
//! This crate provides the execution layer shared by every network-bound
//! operation in the tickerwire workspace:
//!
//! - `retry` - Exponential-backoff retry with a fallback value on exhaustion
//! - `mapper` - Bounded-concurrency mapping over an ordered batch of inputs
//! - `progress` - Incremental progress reporting for batch runs
//!
//! # Example
//!
//! ```rust,ignore
//! use taskpool::{run_concurrently, wrap_with_retry, RetryPolicy, TaskBatch};
//!
//! let fetch = wrap_with_retry(
//!     "scrape_url",
//!     RetryPolicy::new(3),
//!     String::new(),
//!     |url: String| async move { scrape(&url).await },
//! );
//!
//! let contents = run_concurrently(
//!     fetch,
//!     TaskBatch::new(urls).with_label("scraping articles"),
//! )
//! .await?;
//! ```

pub mod mapper;
pub mod progress;
pub mod retry;

pub use mapper::{run_concurrently, TaskBatch, DEFAULT_WORKERS};
pub use progress::BatchProgress;
pub use retry::{with_retry, wrap_with_retry, RetryPolicy};

use thiserror::Error;

/// Errors that can occur when running a batch.
///
/// Failures of individual operations never surface here; a retry-wrapped
/// operation resolves to its fallback value instead. Only batch
/// configuration problems and worker panics are reported.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The batch contained no inputs.
    #[error("batch contains no inputs")]
    EmptyBatch,

    /// The worker bound was zero.
    #[error("worker count must be positive")]
    NoWorkers,

    /// A worker task panicked or was aborted.
    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Result type for batch operations.
pub type Result<T> = std::result::Result<T, PoolError>;
