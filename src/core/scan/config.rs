//! Scan worker configuration

use tracing::warn;

/// Configuration for partitioned scans
///
/// Controls how many workers (and therefore partitions) a scan uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    /// Number of partitions scanned concurrently
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
        }
    }
}

impl ScanConfig {
    /// Create a new ScanConfig, normalizing a worker count of 0 to 1
    pub fn new(workers: usize) -> Self {
        let workers = if workers == 0 {
            warn!(workers, "invalid scan worker count, using 1");
            1
        } else {
            workers
        };

        Self { workers }
    }
}
