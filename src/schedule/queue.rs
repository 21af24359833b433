// src/schedule/queue.rs
// =============================================================================
// A bounded worker pool for async jobs.
//
// How it works:
// 1. Start min(concurrency, items.len()) workers
// 2. Each worker claims the next unclaimed index from a shared cursor,
//    awaits the job, stores (index, result), and claims again
// 3. When the cursor runs past the end, the worker stops
// 4. Once every worker has stopped, results are put back in input order
//
// So there are never more than `concurrency` jobs in flight, and the output
// order never depends on which job finished first.
//
// Everything runs inside the caller's task (join_all), no tokio::spawn:
// workers cannot outlive the call, and nothing needs to be 'static.
//
// Rust concepts:
// - AtomicUsize: A counter several futures can bump without a lock
// - Generics with Fn + Future bounds: "any async function from T to R"
// =============================================================================

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;

// Runs `worker` over every item with at most `concurrency` in flight
//
// Parameters:
//   items: the inputs (cloned into each job)
//   worker: async function applied to one item
//   concurrency: worker count; 0 is treated as 1
//
// Returns: one result per item, in the same order as `items`
pub async fn run_queue<T, R, F, Fut>(items: &[T], worker: F, concurrency: usize) -> Vec<R>
where
    T: Clone,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    if items.is_empty() {
        return Vec::new();
    }

    let cursor = AtomicUsize::new(0);
    let worker_count = concurrency.max(1).min(items.len());

    let cursor = &cursor;
    let worker = &worker;
    let lanes = (0..worker_count).map(|_| async move {
        let mut finished = Vec::new();
        loop {
            // fetch_add hands every index to exactly one worker
            let index = cursor.fetch_add(1, Ordering::SeqCst);
            if index >= items.len() {
                break;
            }
            let result = worker(items[index].clone()).await;
            finished.push((index, result));
        }
        finished
    });

    let mut slots: Vec<Option<R>> = (0..items.len()).map(|_| None).collect();
    for (index, result) in join_all(lanes).await.into_iter().flatten() {
        slots[index] = Some(result);
    }

    slots.into_iter().flatten().collect()
}
