//! Integration tests for batch execution: worker bounds, ordering and
//! retry/fallback composition.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use taskpool::{run_concurrently, wrap_with_retry, RetryPolicy, TaskBatch};
use tokio::time::sleep;

#[tokio::test]
async fn peak_concurrency_never_exceeds_worker_bound() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let in_flight_clone = in_flight.clone();
    let peak_clone = peak.clone();
    let operation = move |n: usize| {
        let in_flight = in_flight_clone.clone();
        let peak = peak_clone.clone();
        async move {
            let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(current, Ordering::SeqCst);
            sleep(Duration::from_millis(20)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            n
        }
    };

    let batch = TaskBatch::new((0..24).collect()).with_workers(3);
    let results = run_concurrently(operation, batch).await.unwrap();

    assert_eq!(results.len(), 24);
    assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    assert!(
        peak.load(Ordering::SeqCst) <= 3,
        "observed peak {} above worker bound",
        peak.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn worker_pool_saturates_under_load() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let in_flight_clone = in_flight.clone();
    let peak_clone = peak.clone();
    let operation = move |n: usize| {
        let in_flight = in_flight_clone.clone();
        let peak = peak_clone.clone();
        async move {
            let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(current, Ordering::SeqCst);
            sleep(Duration::from_millis(50)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            n
        }
    };

    let batch = TaskBatch::new((0..12).collect()).with_workers(4);
    run_concurrently(operation, batch).await.unwrap();

    // With 12 tasks sleeping 50ms each, all four slots fill up.
    assert_eq!(peak.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn failing_input_yields_fallback_in_its_own_slot() {
    let bad_attempts = Arc::new(AtomicUsize::new(0));

    let bad_attempts_clone = bad_attempts.clone();
    let fetch = move |symbol: String| {
        let bad_attempts = bad_attempts_clone.clone();
        async move {
            if symbol == "BAD" {
                bad_attempts.fetch_add(1, Ordering::SeqCst);
                return Err("no quote data");
            }
            Ok(format!("{symbol}:+1.2%"))
        }
    };

    let wrapped = wrap_with_retry(
        "fetch_quote",
        RetryPolicy::new(3).with_initial_interval(0.01),
        String::new(),
        fetch,
    );

    let symbols = vec!["AAPL".to_string(), "MSFT".to_string(), "BAD".to_string()];
    let batch = TaskBatch::new(symbols).with_workers(2).with_label("quotes");
    let results = run_concurrently(wrapped, batch).await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0], "AAPL:+1.2%");
    assert_eq!(results[1], "MSFT:+1.2%");
    assert_eq!(results[2], "");
    assert_eq!(bad_attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_backoff_blocks_only_its_own_worker() {
    // One input retries with a 50ms backoff; the others must drain while
    // it sleeps.
    let completions = Arc::new(AtomicUsize::new(0));

    let completions_clone = completions.clone();
    let operation = move |n: usize| {
        let completions = completions_clone.clone();
        async move {
            let result = if n == 0 { Err("flaky") } else { Ok(n) };
            if result.is_ok() {
                completions.fetch_add(1, Ordering::SeqCst);
            }
            result
        }
    };

    let wrapped = wrap_with_retry(
        "flaky_op",
        RetryPolicy::new(2).with_initial_interval(0.05),
        0usize,
        operation,
    );

    let start = std::time::Instant::now();
    let batch = TaskBatch::new((0..6).collect()).with_workers(2);
    let results = run_concurrently(wrapped, batch).await.unwrap();

    assert_eq!(results, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(completions.load(Ordering::SeqCst), 5);
    // One worker sleeps through its backoff while the other drains the
    // five instant inputs; the whole batch still finishes promptly.
    assert!(start.elapsed() < Duration::from_millis(250));
}

#[tokio::test]
async fn large_batch_preserves_order_with_mixed_latency() {
    let operation = |n: u64| async move {
        sleep(Duration::from_millis(n % 7 * 5)).await;
        n + 100
    };

    let batch = TaskBatch::new((0..100).collect::<Vec<u64>>())
        .with_workers(8)
        .with_label("mixed latency");
    let results = run_concurrently(operation, batch).await.unwrap();

    assert_eq!(results.len(), 100);
    for (index, value) in results.iter().enumerate() {
        assert_eq!(*value, index as u64 + 100);
    }
}
