//! Favorite payment templates

use super::account::{AccountId, Money};
use super::payment::PaymentCategory;
use serde::{Deserialize, Serialize};

/// Favorite identifier (a generated UUID string)
pub type FavoriteId = String;

/// A saved payment template
///
/// Snapshot of a payment's account, amount and category taken when the
/// favorite was created. Field order matches the persisted record layout
/// `id;accountID;name;amount;category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub account_id: AccountId,
    /// Display name chosen by the user
    pub name: String,
    pub amount: Money,
    pub category: PaymentCategory,
}
