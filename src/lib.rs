//! Wallet Ledger Library
//! # Overview
//!
//! This library provides an in-memory wallet ledger with concurrent partitioned
//! scans over its payments and flat-file persistence of its state.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Payment, Favorite, LedgerError)
//! - [`cli`] - CLI arguments parsing and command execution
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Account, payment and favorite store with CRUD operations
//!   - [`core::scan`] - Partitioned scan engine (sum, filter by account, filter by predicate)
//! - [`io`] - Dump files in directory mode and single-file mode
//!
//! # Payment Lifecycle
//!
//! - **Pay**: debits the account and records an `INPROGRESS` payment
//! - **Reject**: marks the payment `FAIL` and credits its amount back, once
//! - **Repeat** / **Pay from favorite**: issue a new payment with the same terms
//!
//! # Scans
//!
//! Scans split the payment collection into contiguous ranges, one per worker,
//! and merge the partial results. The result never depends on the worker count.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{Ledger, ScanConfig, ScanEngine};
pub use io::{DumpFormat, ImportSummary};
pub use types::{
    Account, AccountId, Favorite, FavoriteId, LedgerError, Money, Payment, PaymentCategory,
    PaymentId, PaymentStatus, Phone,
};
