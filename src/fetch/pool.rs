// src/fetch/pool.rs
// =============================================================================
// This module fetches many URLs concurrently through a bounded worker pool.
//
// How it works:
// 1. Each URL becomes one future that resolves to exactly one FetchResult,
//    whether the fetch succeeded or failed
// 2. buffer_unordered(W) drives at most W of those futures at a time,
//    pulling the next URL off the shared task stream as a slot frees up
// 3. collect() aggregates every result after all workers have finished
//
// Guarantees:
// - Exactly one FetchResult per input URL, never dropped or duplicated
// - One URL's failure never blocks or aborts the others
// - Results arrive in completion order, not submission order
//
// Rust concepts:
// - Generics: The pool takes the fetch operation as a parameter, so tests
//   can drive it with stubs instead of a live network
// - Streams: For processing many items with bounded concurrency
// =============================================================================

use futures::stream::{self, StreamExt};
use std::future::Future;

use super::{build_client, fetch_html, FetchError};
use crate::og::{extract_og, Snapshot};

/// The outcome of fetching one URL. Produced by a pool worker and
/// consumed exactly once by the aggregator.
#[derive(Debug)]
pub enum FetchResult {
    /// The page was fetched and its Open Graph tags extracted
    Success { url: String, snapshot: Snapshot },
    /// The fetch failed; the page's tags are unknown
    Failure { url: String, error: FetchError },
}

impl FetchResult {
    /// The URL this result belongs to, regardless of outcome
    pub fn url(&self) -> &str {
        match self {
            FetchResult::Success { url, .. } => url,
            FetchResult::Failure { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }
}

// Resolves the effective worker count for a batch
//
// Parameters:
//   requested: the --workers flag, if given
//   url_count: how many URLs the batch contains
//
// Defaults to the number of available CPUs, then clamps to
// 1 <= workers <= url_count so a single URL never spawns a whole pool
pub fn resolve_workers(requested: Option<usize>, url_count: usize) -> usize {
    let auto = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    let wanted = match requested {
        Some(n) if n > 0 => n,
        _ => auto,
    };
    wanted.min(url_count).max(1)
}

// Fetches every URL through a pool of at most `workers` concurrent fetches
//
// Parameters:
//   urls: the batch to fetch (finite, ordered; order does not survive)
//   workers: maximum number of fetches in flight at once
//   fetch: the per-URL fetch operation; its own timeout bounds each call
//
// Returns: one FetchResult per input URL, in completion order
//
// The fetch operation is a parameter (rather than hard-wired HTTP) so the
// pool's guarantees can be tested without a network
pub async fn fetch_pool<F, Fut>(urls: Vec<String>, workers: usize, fetch: F) -> Vec<FetchResult>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Snapshot, FetchError>>,
{
    // Each task emits exactly one result; errors are captured as data so
    // a failing URL cannot abort its siblings
    let tasks = urls.into_iter().map(|url| {
        let fut = fetch(url.clone());
        async move {
            match fut.await {
                Ok(snapshot) => FetchResult::Success { url, snapshot },
                Err(error) => FetchResult::Failure { url, error },
            }
        }
    });

    // buffer_unordered pulls a new task off the stream whenever one of the
    // W slots frees up, which is exactly a bounded worker pool draining a
    // shared queue; collect() runs until every task has reported
    stream::iter(tasks)
        .buffer_unordered(workers.max(1))
        .collect()
        .await
}

// Fetches and extracts Open Graph tags for a batch of URLs over HTTP
//
// This is the production entry point used by the inspect command; the
// per-request timeout lives in the client, never in the pool
pub async fn inspect_urls(
    urls: Vec<String>,
    workers: usize,
    timeout_secs: u64,
) -> Result<Vec<FetchResult>, FetchError> {
    let client = build_client(timeout_secs)?;

    let results = fetch_pool(urls, workers, |url| {
        // Clone the client for each task; it is an Arc around a pool
        let client = client.clone();
        async move {
            let html = fetch_html(&client, &url).await?;
            Ok(extract_og(&html))
        }
    })
    .await;

    Ok(results)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is StreamExt and buffer_unordered?
//    - StreamExt is a trait (like an interface) that adds methods to streams
//    - buffer_unordered(N) runs up to N futures concurrently
//    - It's like Promise.all() but with a concurrency limit
//
// 2. Why is the fetch operation a generic parameter?
//    - The pool's guarantees (one result per URL, bounded concurrency)
//      don't depend on HTTP at all
//    - Tests pass a closure that fails on demand; production passes the
//      real HTTP fetch + extraction
//
// 3. Why clone the client?
//    - Each async task needs its own handle to the client
//    - Client is cheap to clone (it's just a reference counter internally)
//    - This is a common pattern in async Rust
//
// 4. What does "completion order" mean?
//    - buffer_unordered yields results as their futures finish
//    - A fast fetch submitted last can come out first
//    - Consumers must match results to inputs by URL, not by position
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://example.com/{}", i)).collect()
    }

    fn tag(value: &str) -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert("title".to_string(), value.to_string());
        snapshot
    }

    #[tokio::test]
    async fn test_one_result_per_url_across_worker_counts() {
        for workers in [1, 2, 3, 5] {
            let input = urls(5);
            let results = fetch_pool(input.clone(), workers, |url| async move {
                Ok(tag(&url))
            })
            .await;

            assert_eq!(results.len(), input.len());
            let seen: HashSet<&str> = results.iter().map(|r| r.url()).collect();
            assert_eq!(seen.len(), input.len());
            for url in &input {
                assert!(seen.contains(url.as_str()));
            }
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_disturb_siblings() {
        // One of three URLs fails with a simulated transport error; the
        // batch still yields all three results with both successes intact
        let input = urls(3);
        let results = fetch_pool(input, 3, |url| async move {
            if url.ends_with("/1") {
                Err(FetchError::Transport("connection reset".to_string()))
            } else {
                Ok(tag(&url))
            }
        })
        .await;

        assert_eq!(results.len(), 3);
        let failures: Vec<_> = results.iter().filter(|r| !r.is_success()).collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].url(), "https://example.com/1");
        assert_eq!(results.iter().filter(|r| r.is_success()).count(), 2);
    }

    #[tokio::test]
    async fn test_slow_fetch_does_not_block_the_batch() {
        // With two workers, one slow URL must not stop the other three
        // from completing; completion order is allowed to differ from
        // submission order
        let input = urls(4);
        let results = fetch_pool(input, 2, |url| async move {
            if url.ends_with("/0") {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(tag(&url))
        })
        .await;

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.is_success()));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        // Track the high-water mark of simultaneously running fetches and
        // assert it never exceeds the worker count
        let workers = 3;
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let running_handle = running.clone();
        let peak_handle = peak.clone();
        let results = fetch_pool(urls(10), workers, move |url| {
            let running = running_handle.clone();
            let peak = peak_handle.clone();
            async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(tag(&url))
            }
        })
        .await;

        assert_eq!(results.len(), 10);
        assert!(peak.load(Ordering::SeqCst) <= workers);
    }

    #[test]
    fn test_resolve_workers_clamps_to_url_count() {
        assert_eq!(resolve_workers(Some(8), 3), 3);
        assert_eq!(resolve_workers(Some(2), 5), 2);
        // Zero is treated as "unspecified"
        assert!(resolve_workers(Some(0), 5) >= 1);
        assert!(resolve_workers(None, 1) == 1);
    }
}
