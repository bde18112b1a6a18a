//! Parallel fan-out with a concurrency ceiling.

use anyhow::{anyhow, Result};
use futures::{stream::FuturesUnordered, Future, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Context handed to each item in a batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchContext {
    /// Round number within the surrounding workflow (1-indexed, for logging)
    pub round: usize,
    /// Item number (1-indexed for display)
    pub item_number: usize,
    /// Total items in this batch
    pub total_items: usize,
}

/// Run `executor` over every item concurrently, at most `concurrency` at a
/// time, and collect the results.
///
/// Results arrive in completion order, not input order. The call is a
/// barrier: it returns only once every item has finished. The first item
/// error aborts the whole batch.
pub async fn execute_batch<T, F, Fut, R>(
    round: usize,
    items: Vec<T>,
    concurrency: usize,
    executor: F,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, BatchContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    let total = items.len();
    let sem = Arc::new(Semaphore::new(concurrency.max(1)));
    let executor = Arc::new(executor);
    let mut tasks = FuturesUnordered::new();

    for (idx, item) in items.into_iter().enumerate() {
        let sem = sem.clone();
        let executor = executor.clone();
        let ctx = BatchContext {
            round,
            item_number: idx + 1,
            total_items: total,
        };

        tasks.push(async move {
            let _permit = sem
                .acquire()
                .await
                .map_err(|_| anyhow!("Semaphore closed"))?;

            executor(item, ctx).await
        });
    }

    let mut results = Vec::with_capacity(total);
    while let Some(result) = tasks.next().await {
        results.push(result?);
    }

    Ok(results)
}
