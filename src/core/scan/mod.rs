//! Partitioned scans over the payment collection
//!
//! - `partition` - pure index-range split
//! - `config` - worker count configuration
//! - `engine` - per-call worker pool and merge
//! - `queries` - sum and filter operations on [`Ledger`](crate::core::Ledger)

pub mod config;
pub mod engine;
pub mod partition;
mod queries;

pub use config::ScanConfig;
pub use engine::{Accumulator, ScanEngine};
pub use partition::partition;
