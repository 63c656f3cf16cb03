//! Payment-related types for the wallet ledger
//!
//! This module defines payment records, their lifecycle status and the
//! category tag used to group them.

use super::account::{AccountId, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment identifier (a generated UUID string)
pub type PaymentId = String;

/// Free-form category a payment was made in ("auto", "pharmacy", ...)
pub type PaymentCategory = String;

/// Lifecycle status of a payment
///
/// The persisted spelling is `OK`, `FAIL` and `INPROGRESS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Settled payment
    ///
    /// Reserved for an external settlement step; no ledger operation sets it.
    #[serde(rename = "OK")]
    Ok,

    /// Rejected payment whose amount was returned to the account
    #[serde(rename = "FAIL")]
    Fail,

    /// Freshly created payment, the account has already been debited
    #[serde(rename = "INPROGRESS")]
    InProgress,
}

impl PaymentStatus {
    /// Persisted text form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Ok => "OK",
            PaymentStatus::Fail => "FAIL",
            PaymentStatus::InProgress => "INPROGRESS",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment made from an account
///
/// Field order matches the persisted record layout
/// `id;accountID;amount;category;status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Globally unique payment identifier
    pub id: PaymentId,

    /// Account the payment was debited from
    pub account_id: AccountId,

    /// Paid amount in minor units, always positive
    pub amount: Money,

    /// Category tag
    pub category: PaymentCategory,

    /// Current lifecycle status
    pub status: PaymentStatus,
}
