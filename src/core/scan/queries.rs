//! Ledger scan queries
//!
//! Aggregates over the payment collection, computed by the [`ScanEngine`]
//! with a caller-chosen worker count. Results do not depend on that count;
//! the order of filtered payments does.

use super::engine::ScanEngine;
use crate::core::ledger::Ledger;
use crate::types::{AccountId, LedgerError, Money, Payment};

impl Ledger {
    /// Scan engine over a snapshot of the current payments
    pub fn scan_engine(&self, workers: usize) -> ScanEngine {
        ScanEngine::new(self.shared_payments(), workers)
    }

    /// Sum of all payment amounts (0 for an empty ledger)
    pub fn sum_payments(&self, workers: usize) -> Result<Money, LedgerError> {
        self.scan_engine(workers).run(|chunk: &[Payment]| {
            chunk
                .iter()
                .fold(0, |sum: Money, payment| sum.saturating_add(payment.amount))
        })
    }

    /// All payments belonging to `account_id`
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` before any worker starts if the account does
    /// not exist, or `WorkerFailed` if the scan pool fails.
    pub fn filter_payments(
        &self,
        account_id: AccountId,
        workers: usize,
    ) -> Result<Vec<Payment>, LedgerError> {
        self.find_account_by_id(account_id)?;

        self.scan_engine(workers).run(move |chunk: &[Payment]| {
            chunk
                .iter()
                .filter(|payment| payment.account_id == account_id)
                .cloned()
                .collect::<Vec<Payment>>()
        })
    }

    /// All payments for which `predicate` returns true
    ///
    /// A panicking predicate fails the scan with `WorkerFailed`.
    pub fn filter_payments_by_fn<P>(
        &self,
        predicate: P,
        workers: usize,
    ) -> Result<Vec<Payment>, LedgerError>
    where
        P: Fn(&Payment) -> bool + Send + Sync + 'static,
    {
        self.scan_engine(workers).run(move |chunk: &[Payment]| {
            chunk
                .iter()
                .filter(|payment| predicate(payment))
                .cloned()
                .collect::<Vec<Payment>>()
        })
    }
}
