//! Account-related types for the wallet ledger
//!
//! This module defines the Account structure together with the identifier and
//! money aliases shared by every other record type.

use serde::{Deserialize, Serialize};

/// Account identifier
///
/// Assigned sequentially by the ledger, starting at 1.
pub type AccountId = i64;

/// Phone number used as the unique login of an account
pub type Phone = String;

/// Amount of money in minor currency units (cents, dirams, ...)
pub type Money = i64;

/// Wallet account state
///
/// Field order matches the persisted record layout `id;phone;balance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Sequential account identifier
    pub id: AccountId,

    /// Phone number, unique across all accounts
    pub phone: Phone,

    /// Current balance in minor units
    ///
    /// Signed so that imported dumps carrying a negative balance are
    /// representable, although no ledger operation drives it below zero.
    pub balance: Money,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(id: AccountId, phone: impl Into<Phone>) -> Self {
        Account {
            id,
            phone: phone.into(),
            balance: 0,
        }
    }
}
