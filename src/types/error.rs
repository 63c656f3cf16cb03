//! Error types for the wallet ledger
//!
//! This module defines every error a ledger operation can surface to its caller.
//!
//! # Error Categories
//!
//! - **Validation Errors**: duplicate phone, non-positive amount, overdraft
//! - **Lookup Errors**: unknown account, payment or favorite
//! - **Lifecycle Errors**: rejecting a payment that already failed
//! - **Scan Errors**: the worker pool could not run to completion
//! - **Dump Errors**: I/O failures, malformed records, unencodable fields

use super::account::{AccountId, Money};
use thiserror::Error;

/// Main error type for the wallet ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Registration with a phone that already belongs to an account
    #[error("Phone {phone} is already registered")]
    PhoneAlreadyRegistered {
        /// The duplicate phone
        phone: String,
    },

    /// Deposit or payment with an amount of zero or less
    #[error("Amount must be greater than zero, got {amount}")]
    AmountMustBePositive {
        /// The rejected amount
        amount: Money,
    },

    /// Operation referencing an unknown account
    #[error("Account {account_id} not found")]
    AccountNotFound {
        /// The account id that was looked up
        account_id: AccountId,
    },

    /// Payment amount exceeds the current balance
    ///
    /// The account balance is left unchanged.
    #[error("Not enough balance on account {account_id}: balance {balance}, requested {requested}")]
    NotEnoughBalance {
        /// Account id
        account_id: AccountId,
        /// Balance at the time of the attempt
        balance: Money,
        /// Requested payment amount
        requested: Money,
    },

    /// Lookup by a phone no account is registered for
    #[error("No account registered for phone {phone}")]
    PhoneNotFound {
        /// The phone that was looked up
        phone: String,
    },

    /// Operation referencing an unknown payment
    #[error("Payment {payment_id} not found")]
    PaymentNotFound {
        /// The payment id that was looked up
        payment_id: String,
    },

    /// Operation referencing an unknown favorite
    #[error("Favorite {favorite_id} not found")]
    FavoriteNotFound {
        /// The favorite id that was looked up
        favorite_id: String,
    },

    /// Rejection of a payment that is already in FAIL status
    ///
    /// Guards against crediting the same payment twice.
    #[error("Payment {payment_id} has already been rejected")]
    PaymentAlreadyFailed {
        /// The payment id
        payment_id: String,
    },

    /// Crediting the account would overflow its balance
    #[error("Balance overflow on account {account_id}")]
    BalanceOverflow {
        /// Account id
        account_id: AccountId,
    },

    /// The scan worker pool failed to start or a worker panicked
    #[error("Scan worker failed: {message}")]
    WorkerFailed {
        /// Description of the failure
        message: String,
    },

    /// I/O error while reading or writing dump files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// Malformed dump record
    #[error("Dump parse error{}: {message}", record.map(|r| format!(" at record {}", r)).unwrap_or_default())]
    Parse {
        /// 1-based record number (if available)
        record: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A free-form field cannot be written in the legacy dump format
    #[error("Field {field} value '{value}' contains a dump delimiter")]
    UnencodableField {
        /// Field name
        field: String,
        /// Offending value
        value: String,
    },

    /// A mutating command would overwrite dump data that failed to load
    #[error("Data directory has {skipped} unreadable records and {unreadable_files} unreadable files; refusing to overwrite it (use --repair to drop them)")]
    IncompleteLoad {
        /// Records skipped while loading
        skipped: usize,
        /// Dump files that exist but could not be opened
        unreadable_files: usize,
    },

    /// History export asked for zero records per file
    #[error("Records per history file must be at least 1, got {records}")]
    InvalidRecordsPerFile {
        /// The rejected threshold
        records: usize,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let record = error.position().map(|pos| pos.record() + 1);

        LedgerError::Parse {
            record,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a PhoneAlreadyRegistered error
    pub fn phone_already_registered(phone: &str) -> Self {
        LedgerError::PhoneAlreadyRegistered {
            phone: phone.to_string(),
        }
    }

    /// Create an AmountMustBePositive error
    pub fn amount_must_be_positive(amount: Money) -> Self {
        LedgerError::AmountMustBePositive { amount }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account_id: AccountId) -> Self {
        LedgerError::AccountNotFound { account_id }
    }

    /// Create a NotEnoughBalance error
    pub fn not_enough_balance(account_id: AccountId, balance: Money, requested: Money) -> Self {
        LedgerError::NotEnoughBalance {
            account_id,
            balance,
            requested,
        }
    }

    /// Create a PhoneNotFound error
    pub fn phone_not_found(phone: &str) -> Self {
        LedgerError::PhoneNotFound {
            phone: phone.to_string(),
        }
    }

    /// Create a PaymentNotFound error
    pub fn payment_not_found(payment_id: &str) -> Self {
        LedgerError::PaymentNotFound {
            payment_id: payment_id.to_string(),
        }
    }

    /// Create a FavoriteNotFound error
    pub fn favorite_not_found(favorite_id: &str) -> Self {
        LedgerError::FavoriteNotFound {
            favorite_id: favorite_id.to_string(),
        }
    }

    /// Create a PaymentAlreadyFailed error
    pub fn payment_already_failed(payment_id: &str) -> Self {
        LedgerError::PaymentAlreadyFailed {
            payment_id: payment_id.to_string(),
        }
    }

    /// Create a WorkerFailed error
    pub fn worker_failed(message: impl Into<String>) -> Self {
        LedgerError::WorkerFailed {
            message: message.into(),
        }
    }

    /// Create a Parse error for a record number
    pub fn parse(record: Option<u64>, message: impl Into<String>) -> Self {
        LedgerError::Parse {
            record,
            message: message.into(),
        }
    }

    /// Create an UnencodableField error
    pub fn unencodable_field(field: &str, value: &str) -> Self {
        LedgerError::UnencodableField {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
