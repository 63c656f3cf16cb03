//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Trait abstractions for interchangeable implementations
//! - `ledger` - Account, payment and favorite store with CRUD operations
//! - `scan` - Partitioned concurrent scans (sum, filters)

pub mod ledger;
pub mod scan;
pub mod traits;

pub use ledger::{Ledger, MergeOutcome};
pub use scan::{partition, Accumulator, ScanConfig, ScanEngine};
pub use traits::{IdGenerator, SequentialIds, UuidGenerator};
