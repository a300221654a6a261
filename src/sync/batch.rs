// animelistsync/src/sync/batch.rs
use futures::future::join_all;
use std::fmt::Display;
use std::future::Future;
use tracing::{debug, warn};

use crate::errors::AppError;

/// A write that failed; kept so the run can report it at the end.
#[derive(Debug)]
pub struct WriteFailure {
    pub operation: String,
    pub error: AppError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Size of each chunk, in the order the chunks ran.
    pub chunk_sizes: Vec<usize>,
    pub succeeded: usize,
    pub failures: Vec<WriteFailure>,
}

/// Runs `write` over `ops` in consecutive chunks of at most `batch_size`.
///
/// Writes inside a chunk run concurrently; a chunk starts only after every
/// write of the previous one has finished. Failed writes are not retried.
/// They are recorded in the report and the remaining chunks still run.
pub async fn run_batches<T, F, Fut>(ops: Vec<T>, batch_size: usize, write: F) -> BatchReport
where
    T: Display,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<(), AppError>>,
{
    let batch_size = batch_size.max(1);
    let total_chunks = ops.len().div_ceil(batch_size);
    let mut report = BatchReport::default();
    let mut remaining = ops.into_iter();

    loop {
        let chunk: Vec<T> = remaining.by_ref().take(batch_size).collect();
        if chunk.is_empty() {
            break;
        }
        report.chunk_sizes.push(chunk.len());
        debug!(
            "Running chunk {}/{} with {} writes",
            report.chunk_sizes.len(),
            total_chunks,
            chunk.len()
        );

        let results = join_all(chunk.into_iter().map(|op| {
            let label = op.to_string();
            let pending = write(op);
            async move { (label, pending.await) }
        }))
        .await;

        for (operation, result) in results {
            match result {
                Ok(()) => report.succeeded += 1,
                Err(error) => {
                    warn!("⚠️ Failed to {}: {}", operation, error);
                    report.failures.push(WriteFailure { operation, error });
                }
            }
        }
    }

    report
}
