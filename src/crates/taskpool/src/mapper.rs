//! Bounded-concurrency mapping over an ordered batch of inputs.
//!
//! Applies one operation per input across a fixed-size pool of workers,
//! collecting one output per input. Concurrency affects when each
//! operation runs, never where its result lands: `results[i]` always
//! corresponds to `inputs[i]`.

use crate::progress::BatchProgress;
use crate::{PoolError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Worker bound used when a batch does not specify one.
pub const DEFAULT_WORKERS: usize = 5;

/// One ordered collection of inputs plus its execution settings.
///
/// Built immediately before a mapping call and consumed by it.
///
/// # Example
///
/// ```rust
/// use taskpool::TaskBatch;
///
/// let batch = TaskBatch::new(vec!["AAPL", "MSFT", "NVDA"])
///     .with_workers(2)
///     .with_label("fetching daily quotes");
/// assert_eq!(batch.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TaskBatch<I> {
    inputs: Vec<I>,
    workers: usize,
    label: String,
}

impl<I> TaskBatch<I> {
    /// Create a batch over `inputs` with the default worker bound and no label.
    pub fn new(inputs: Vec<I>) -> Self {
        Self {
            inputs,
            workers: DEFAULT_WORKERS,
            label: String::new(),
        }
    }

    /// Set the worker bound
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the label shown in progress output
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Number of inputs in the batch
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Apply `operation` to every input in `batch` with bounded concurrency.
///
/// Each input is dispatched exactly once; at most `batch.workers`
/// invocations are in flight at any instant. The returned list has the
/// same length and order as the inputs regardless of completion order,
/// and the call does not return until every input has produced a result.
/// Progress advances once per completed input.
///
/// Configuration problems (an empty batch, a worker bound of zero) are
/// rejected before any dispatch. A panicking operation surfaces as
/// [`PoolError::Worker`] after the remaining workers are torn down; an
/// operation's ordinary failure never aborts the batch — wrap the
/// operation with [`crate::wrap_with_retry`] so failures resolve to a
/// fallback value instead.
///
/// There is no batch-level deadline: if one operation hangs forever, so
/// does the call. Per-call timeouts belong to the operation itself.
///
/// # Example
///
/// ```rust,ignore
/// use taskpool::{run_concurrently, TaskBatch};
///
/// let contents = run_concurrently(
///     scrape,
///     TaskBatch::new(urls).with_label("scraping articles"),
/// )
/// .await?;
/// assert_eq!(contents.len(), urls.len());
/// ```
pub async fn run_concurrently<I, F, Fut, T>(operation: F, batch: TaskBatch<I>) -> Result<Vec<T>>
where
    I: Send + 'static,
    F: Fn(I) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    if batch.inputs.is_empty() {
        return Err(PoolError::EmptyBatch);
    }
    if batch.workers == 0 {
        return Err(PoolError::NoWorkers);
    }

    let total = batch.inputs.len();
    tracing::debug!(
        label = %batch.label,
        total,
        workers = batch.workers,
        "dispatching batch"
    );

    let progress = BatchProgress::new(total as u64, &batch.label);
    let semaphore = Arc::new(Semaphore::new(batch.workers));
    let mut tasks = JoinSet::new();

    for (index, input) in batch.inputs.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let operation = operation.clone();
        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("batch semaphore is never closed");
            (index, operation(input).await)
        });
    }

    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, value)) => {
                slots[index] = Some(value);
                progress.advance();
            }
            Err(error) => {
                // Dropping the JoinSet aborts whatever is still in flight.
                progress.abandon();
                return Err(PoolError::Worker(error));
            }
        }
    }
    progress.finish();

    tracing::debug!(label = %batch.label, total, "batch complete");

    Ok(slots
        .into_iter()
        .map(|slot| slot.expect("every spawned task reports exactly one result"))
        .collect())
}
