//! Retry utilities for async operations
//!
//! Provides configurable retry with exponential backoff for handling
//! transient failures, plus a wrapper that converts an exhausted retry
//! budget into a caller-supplied fallback value instead of an error.

use futures::future::BoxFuture;
use futures::FutureExt;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Configuration for retrying failed operations
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first)
    pub max_attempts: usize,

    /// Delay in seconds after the first failure
    pub initial_interval: f64,

    /// Multiplier for the delay after each further failure
    pub backoff_factor: f64,

    /// Maximum delay between attempts in seconds
    pub max_interval: f64,

    /// Whether to add random jitter to delays
    pub jitter: bool,
}

impl RetryPolicy {
    /// Create a new retry policy with the given max attempts.
    ///
    /// Values below 1 are normalized to a single attempt. The default
    /// intervals produce delays of 2, 4, 8, ... seconds between attempts.
    ///
    /// # Example
    ///
    /// ```rust
    /// use taskpool::retry::RetryPolicy;
    ///
    /// let policy = RetryPolicy::new(3);
    /// assert_eq!(policy.max_attempts, 3);
    /// ```
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_interval: 2.0,
            backoff_factor: 2.0,
            max_interval: 128.0,
            jitter: false,
        }
    }

    /// Set the delay after the first failure
    pub fn with_initial_interval(mut self, seconds: f64) -> Self {
        self.initial_interval = seconds;
        self
    }

    /// Set the backoff factor
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Set the maximum delay between attempts
    pub fn with_max_interval(mut self, seconds: f64) -> Self {
        self.max_interval = seconds;
        self
    }

    /// Enable or disable jitter
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Calculate the delay after the n-th failure (1-indexed).
    ///
    /// Uses exponential backoff: `initial_interval * backoff_factor^(n-1)`,
    /// capped at `max_interval`, with optional jitter (0.5x to 1.5x).
    pub fn delay_for(&self, failures: usize) -> Duration {
        let exponent = failures.saturating_sub(1);
        let base_delay = self.initial_interval * self.backoff_factor.powi(exponent as i32);
        let capped_delay = base_delay.min(self.max_interval);

        let final_delay = if self.jitter {
            let mut rng = rand::thread_rng();
            let jitter_factor = rng.gen_range(0.5..=1.5);
            capped_delay * jitter_factor
        } else {
            capped_delay
        };

        Duration::from_secs_f64(final_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Execute an async operation with retry logic.
///
/// Invokes `operation`; a success is returned immediately, with no delay or
/// bookkeeping on the success path. Each failure sleeps for the policy's
/// backoff delay before the next attempt. Once `max_attempts` invocations
/// have failed, the last error is returned. The sleep suspends only the
/// calling task; concurrent invocations proceed independently.
///
/// All error kinds are retried uniformly; the policy does not distinguish
/// retryable from non-retryable failures.
///
/// # Example
///
/// ```rust,ignore
/// use taskpool::retry::{with_retry, RetryPolicy};
///
/// let policy = RetryPolicy::new(3);
/// let quote = with_retry(&policy, || fetch_quote("AAPL")).await?;
/// ```
pub async fn with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    operation: F,
) -> std::result::Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    let mut failures = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if failures > 0 {
                    tracing::info!(attempts = failures + 1, "operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => {
                failures += 1;
                if failures >= policy.max_attempts {
                    return Err(error);
                }

                let delay = policy.delay_for(failures);
                tracing::debug!(
                    attempt = failures,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis(),
                    %error,
                    "attempt failed, retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Wrap a fallible operation with retry and a fallback value.
///
/// Returns a new operation with the same input shape as `operation` whose
/// output is infallible: retries follow `policy`, and once the attempt
/// budget is exhausted the failure is reported through `tracing::error!`
/// (operation name, final error, attempt count) and `fallback` is returned
/// in place of a result. This keeps a batch alive when individual inputs
/// keep failing.
///
/// # Example
///
/// ```rust,ignore
/// use taskpool::retry::{wrap_with_retry, RetryPolicy};
///
/// let scrape = wrap_with_retry(
///     "scrape_url",
///     RetryPolicy::new(3),
///     String::new(),
///     |url: String| async move { fetch_text(&url).await },
/// );
/// let content = scrape("https://example.com/article".to_string()).await;
/// ```
pub fn wrap_with_retry<I, F, Fut, T, E>(
    name: impl Into<String>,
    policy: RetryPolicy,
    fallback: T,
    operation: F,
) -> impl Fn(I) -> BoxFuture<'static, T> + Clone
where
    I: Clone + Send + Sync + 'static,
    F: Fn(I) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    T: Clone + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let name = name.into();

    move |input: I| {
        let operation = operation.clone();
        let policy = policy.clone();
        let fallback = fallback.clone();
        let name = name.clone();

        async move {
            match with_retry(&policy, || operation(input.clone())).await {
                Ok(value) => value,
                Err(error) => {
                    tracing::error!(
                        operation = %name,
                        attempts = policy.max_attempts,
                        %error,
                        "operation failed after all retry attempts, using fallback"
                    );
                    fallback
                }
            }
        }
        .boxed()
    }
}
