//! Partitioned scan engine
//!
//! This module provides the `ScanEngine` struct, which runs a read-only scan
//! over the payment collection with one tokio task per partition.
//!
//! # Architecture
//!
//! ```text
//! ScanEngine::run
//!     ├── partition(total, workers)      (contiguous index ranges)
//!     ├── multi-thread runtime           (built per call, dropped on return)
//!     │     └── one task per range       (private partial result)
//!     └── Arc<Mutex<A>>                  (merge point, locked once per task)
//! ```
//!
//! The call blocks until every task has merged. A task that panics fails the
//! whole scan with `WorkerFailed`; no partial result is returned.

use std::sync::{Arc, Mutex, PoisonError};

use futures::future::join_all;
use tracing::debug;

use super::partition::partition;
use crate::types::{LedgerError, Money, Payment};

/// A partial scan result that can absorb another one
///
/// Merge order across workers is unspecified, so implementations must not
/// depend on it.
pub trait Accumulator: Default + Send + 'static {
    fn merge(&mut self, partial: Self);
}

impl Accumulator for Money {
    fn merge(&mut self, partial: Self) {
        *self = self.saturating_add(partial);
    }
}

impl<T: Send + 'static> Accumulator for Vec<T> {
    fn merge(&mut self, partial: Self) {
        self.extend(partial);
    }
}

/// Runs scans over a shared snapshot of the payment collection
#[derive(Debug, Clone)]
pub struct ScanEngine {
    payments: Arc<Vec<Payment>>,
    workers: usize,
}

impl ScanEngine {
    /// Create an engine over `payments`; a worker count of 0 is treated as 1
    pub fn new(payments: Arc<Vec<Payment>>, workers: usize) -> Self {
        Self {
            payments,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `scan` over every partition and merge the partial results
    ///
    /// One task is spawned per partition, but the runtime gets only
    /// `min(workers, CPUs)` threads, so with more workers than CPUs some
    /// partitions share a thread instead of running in parallel. The result
    /// is the same either way.
    ///
    /// Must not be called from inside an async runtime: the engine builds and
    /// blocks on its own.
    ///
    /// # Errors
    ///
    /// Returns `WorkerFailed` if the runtime cannot be started or a worker
    /// task panics.
    pub fn run<A, F>(&self, scan: F) -> Result<A, LedgerError>
    where
        A: Accumulator,
        F: Fn(&[Payment]) -> A + Send + Sync + 'static,
    {
        let ranges = partition(self.payments.len(), self.workers);
        debug!(
            total = self.payments.len(),
            workers = self.workers,
            ?ranges,
            "partitioned payments"
        );

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.workers.min(num_cpus::get()).max(1))
            .thread_name("wallet-scan")
            .build()
            .map_err(|e| LedgerError::worker_failed(format!("cannot start scan pool: {}", e)))?;

        let scan = Arc::new(scan);
        let total = Arc::new(Mutex::new(A::default()));

        runtime.block_on(async {
            let handles: Vec<_> = ranges
                .into_iter()
                .enumerate()
                .map(|(worker, range)| {
                    let payments = Arc::clone(&self.payments);
                    let scan = Arc::clone(&scan);
                    let total = Arc::clone(&total);

                    tokio::spawn(async move {
                        if range.is_empty() {
                            return;
                        }
                        let partial = (*scan)(&payments[range.clone()]);
                        debug!(worker, start = range.start, end = range.end, "merging partial result");
                        total
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .merge(partial);
                    })
                })
                .collect();

            for result in join_all(handles).await {
                result.map_err(|e| LedgerError::worker_failed(e.to_string()))?;
            }
            Ok::<(), LedgerError>(())
        })?;

        let mut total = total.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(std::mem::take(&mut *total))
    }
}
