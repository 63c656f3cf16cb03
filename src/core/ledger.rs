//! Ledger store module
//!
//! This module provides the `Ledger` struct which owns every account, payment
//! and favorite, plus the account-id counter.
//!
//! The Ledger is responsible for:
//! - Registering accounts with sequential ids and unique phones
//! - Balance operations (deposit, pay, reject) with validation before mutation
//! - Favorite templates and re-issuing payments from them
//! - Merge primitives used by the dump importers
//!
//! Lookups are linear scans over unindexed lists. Mutation requires `&mut self`,
//! so it can never overlap a scan borrowing the same ledger.

use crate::core::traits::{IdGenerator, UuidGenerator};
use crate::types::{
    Account, AccountId, Favorite, LedgerError, Money, Payment, PaymentStatus,
};
use std::sync::Arc;

/// What a merge primitive did with an incoming record
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// No record with that id existed, the record was appended
    Inserted,
    /// A record with that id existed and its fields were overwritten
    Updated,
    /// The record was refused and the ledger left unchanged
    Rejected(LedgerError),
}

/// In-memory wallet ledger
///
/// Payments live behind an `Arc` so the scan engine can hand a read-only
/// snapshot to its workers; every mutation goes through `Arc::make_mut`.
pub struct Ledger {
    /// Last assigned account id (0 before the first registration)
    last_account_id: AccountId,
    accounts: Vec<Account>,
    payments: Arc<Vec<Payment>>,
    favorites: Vec<Favorite>,
    ids: Box<dyn IdGenerator>,
}

impl Ledger {
    /// Create an empty ledger generating UUID payment and favorite ids
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(UuidGenerator))
    }

    /// Create an empty ledger with a custom identifier source
    pub fn with_id_generator(ids: Box<dyn IdGenerator>) -> Self {
        Ledger {
            last_account_id: 0,
            accounts: Vec::new(),
            payments: Arc::new(Vec::new()),
            favorites: Vec::new(),
            ids,
        }
    }

    /// All accounts in registration/import order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// All payments in creation/import order
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// All favorites in creation/import order
    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    /// The id handed out by the most recent registration (or import)
    pub fn last_account_id(&self) -> AccountId {
        self.last_account_id
    }

    /// Cheap shared handle on the payment collection for scan workers
    pub(crate) fn shared_payments(&self) -> Arc<Vec<Payment>> {
        Arc::clone(&self.payments)
    }

    /// Register a new account for a phone number
    ///
    /// # Errors
    ///
    /// Returns `PhoneAlreadyRegistered` if any account already uses `phone`.
    pub fn register_account(&mut self, phone: &str) -> Result<Account, LedgerError> {
        if self.accounts.iter().any(|account| account.phone == phone) {
            return Err(LedgerError::phone_already_registered(phone));
        }

        self.last_account_id += 1;
        let account = Account::new(self.last_account_id, phone);
        self.accounts.push(account.clone());

        Ok(account)
    }

    /// Find an account by its id
    pub fn find_account_by_id(&self, account_id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts
            .iter()
            .find(|account| account.id == account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    /// Find an account by its phone number
    pub fn find_account_by_phone(&self, phone: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .iter()
            .find(|account| account.phone == phone)
            .ok_or_else(|| LedgerError::phone_not_found(phone))
    }

    fn account_mut(&mut self, account_id: AccountId) -> Result<&mut Account, LedgerError> {
        self.accounts
            .iter_mut()
            .find(|account| account.id == account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    /// Deposit funds into an account
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is zero or negative
    /// - the account does not exist
    /// - the new balance would overflow
    ///
    /// The balance is unchanged on every error path.
    pub fn deposit(&mut self, account_id: AccountId, amount: Money) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::amount_must_be_positive(amount));
        }

        let account = self.account_mut(account_id)?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account_id })?;

        Ok(())
    }

    /// Pay from an account
    ///
    /// Debits the account and records a new payment in IN_PROGRESS status.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is zero or negative
    /// - the account does not exist
    /// - the balance is lower than `amount`
    ///
    /// The balance is unchanged on every error path.
    pub fn pay(
        &mut self,
        account_id: AccountId,
        amount: Money,
        category: &str,
    ) -> Result<Payment, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::amount_must_be_positive(amount));
        }

        let account = self.account_mut(account_id)?;
        if account.balance < amount {
            return Err(LedgerError::not_enough_balance(
                account_id,
                account.balance,
                amount,
            ));
        }
        account.balance -= amount;

        let payment = Payment {
            id: self.ids.next_id(),
            account_id,
            amount,
            category: category.to_string(),
            status: PaymentStatus::InProgress,
        };
        Arc::make_mut(&mut self.payments).push(payment.clone());

        Ok(payment)
    }

    fn payment_index(&self, payment_id: &str) -> Result<usize, LedgerError> {
        self.payments
            .iter()
            .position(|payment| payment.id == payment_id)
            .ok_or_else(|| LedgerError::payment_not_found(payment_id))
    }

    /// Find a payment by its id
    pub fn find_payment_by_id(&self, payment_id: &str) -> Result<&Payment, LedgerError> {
        self.payment_index(payment_id)
            .map(|index| &self.payments[index])
    }

    /// Reject a payment and credit its amount back to the account
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the payment does not exist
    /// - the payment is already in FAIL status (no second credit)
    /// - the payment's account does not exist
    /// - the credit would overflow the balance
    pub fn reject(&mut self, payment_id: &str) -> Result<(), LedgerError> {
        let index = self.payment_index(payment_id)?;
        let payment = &self.payments[index];
        if payment.status == PaymentStatus::Fail {
            return Err(LedgerError::payment_already_failed(payment_id));
        }
        let (account_id, amount) = (payment.account_id, payment.amount);

        let account = self.account_mut(account_id)?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account_id })?;

        Arc::make_mut(&mut self.payments)[index].status = PaymentStatus::Fail;

        Ok(())
    }

    /// Issue a new payment with the same account, amount and category
    pub fn repeat(&mut self, payment_id: &str) -> Result<Payment, LedgerError> {
        let payment = self.find_payment_by_id(payment_id)?;
        let (account_id, amount, category) =
            (payment.account_id, payment.amount, payment.category.clone());

        self.pay(account_id, amount, &category)
    }

    /// Save a payment as a named favorite template
    pub fn favorite_payment(
        &mut self,
        payment_id: &str,
        name: &str,
    ) -> Result<Favorite, LedgerError> {
        let payment = self.find_payment_by_id(payment_id)?;
        let (account_id, amount, category) =
            (payment.account_id, payment.amount, payment.category.clone());

        let favorite = Favorite {
            id: self.ids.next_id(),
            account_id,
            name: name.to_string(),
            amount,
            category,
        };
        self.favorites.push(favorite.clone());

        Ok(favorite)
    }

    /// Find a favorite by its id
    pub fn find_favorite_by_id(&self, favorite_id: &str) -> Result<&Favorite, LedgerError> {
        self.favorites
            .iter()
            .find(|favorite| favorite.id == favorite_id)
            .ok_or_else(|| LedgerError::favorite_not_found(favorite_id))
    }

    /// Pay using the account, amount and category stored in a favorite
    pub fn pay_from_favorite(&mut self, favorite_id: &str) -> Result<Payment, LedgerError> {
        let favorite = self.find_favorite_by_id(favorite_id)?;
        let (account_id, amount, category) =
            (favorite.account_id, favorite.amount, favorite.category.clone());

        self.pay(account_id, amount, &category)
    }

    fn reserve_account_id(&mut self, account_id: AccountId) {
        self.last_account_id = self.last_account_id.max(account_id);
    }

    /// Overwrite the account with the same id, or append it
    ///
    /// An account whose phone already belongs to another id is rejected with
    /// `PhoneAlreadyRegistered`. Otherwise the id counter is advanced so later
    /// registrations cannot collide.
    pub fn merge_account(&mut self, incoming: Account) -> MergeOutcome {
        if self
            .accounts
            .iter()
            .any(|a| a.phone == incoming.phone && a.id != incoming.id)
        {
            return MergeOutcome::Rejected(LedgerError::phone_already_registered(&incoming.phone));
        }
        self.reserve_account_id(incoming.id);

        match self.accounts.iter_mut().find(|a| a.id == incoming.id) {
            Some(existing) => {
                existing.phone = incoming.phone;
                existing.balance = incoming.balance;
                MergeOutcome::Updated
            }
            None => {
                self.accounts.push(incoming);
                MergeOutcome::Inserted
            }
        }
    }

    /// Append an account without looking for an existing id
    ///
    /// Duplicate ids are possible; used by the single-file append import.
    pub fn append_account(&mut self, incoming: Account) {
        self.reserve_account_id(incoming.id);
        self.accounts.push(incoming);
    }

    /// Overwrite the payment with the same id, or append it
    pub fn merge_payment(&mut self, incoming: Payment) -> MergeOutcome {
        let payments = Arc::make_mut(&mut self.payments);

        match payments.iter_mut().find(|p| p.id == incoming.id) {
            Some(existing) => {
                *existing = incoming;
                MergeOutcome::Updated
            }
            None => {
                payments.push(incoming);
                MergeOutcome::Inserted
            }
        }
    }

    /// Overwrite the favorite with the same id, or append it
    pub fn merge_favorite(&mut self, incoming: Favorite) -> MergeOutcome {
        match self.favorites.iter_mut().find(|f| f.id == incoming.id) {
            Some(existing) => {
                *existing = incoming;
                MergeOutcome::Updated
            }
            None => {
                self.favorites.push(incoming);
                MergeOutcome::Inserted
            }
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::SequentialIds;
    use rstest::rstest;

    fn ledger() -> Ledger {
        Ledger::with_id_generator(Box::new(SequentialIds::new("id")))
    }

    /// Ledger with one account holding `balance` and one 1_000_00 "auto" payment
    fn ledger_with_payment(balance: Money) -> (Ledger, Account, Payment) {
        let mut ledger = ledger();
        let account = ledger.register_account("+992000000001").unwrap();
        ledger.deposit(account.id, balance).unwrap();
        let payment = ledger.pay(account.id, 1_000_00, "auto").unwrap();
        (ledger, account, payment)
    }

    #[test]
    fn test_new_creates_empty_ledger() {
        let ledger = Ledger::new();
        assert!(ledger.accounts().is_empty());
        assert!(ledger.payments().is_empty());
        assert!(ledger.favorites().is_empty());
        assert_eq!(ledger.last_account_id(), 0);
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut ledger = ledger();

        let first = ledger.register_account("+992000000001").unwrap();
        let second = ledger.register_account("+992000000002").unwrap();
        let third = ledger.register_account("+992000000003").unwrap();

        assert_eq!((first.id, second.id, third.id), (1, 2, 3));
        assert_eq!(first.balance, 0);
        assert_eq!(ledger.last_account_id(), 3);
    }

    #[test]
    fn test_register_rejects_duplicate_phone() {
        let mut ledger = ledger();
        ledger.register_account("+992000000001").unwrap();

        let result = ledger.register_account("+992000000001");

        assert_eq!(
            result.unwrap_err(),
            LedgerError::phone_already_registered("+992000000001")
        );
        assert_eq!(ledger.accounts().len(), 1);
        assert_eq!(ledger.last_account_id(), 1);
    }

    #[test]
    fn test_find_account_by_id_and_phone() {
        let mut ledger = ledger();
        ledger.register_account("+992000000001").unwrap();
        let second = ledger.register_account("+992000000002").unwrap();
        ledger.register_account("+992000000003").unwrap();

        assert_eq!(ledger.find_account_by_id(second.id).unwrap(), &second);
        assert_eq!(ledger.find_account_by_phone("+992000000002").unwrap(), &second);
        assert!(matches!(
            ledger.find_account_by_id(1000),
            Err(LedgerError::AccountNotFound { account_id: 1000 })
        ));
        assert_eq!(
            ledger.find_account_by_phone("+0").unwrap_err(),
            LedgerError::phone_not_found("+0")
        );
    }

    #[test]
    fn test_deposit_accumulates() {
        let mut ledger = ledger();
        let account = ledger.register_account("+992000000001").unwrap();

        ledger.deposit(account.id, 100).unwrap();
        ledger.deposit(account.id, 250).unwrap();

        assert_eq!(ledger.find_account_by_id(account.id).unwrap().balance, 350);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::negative(-10)]
    fn test_deposit_non_positive_leaves_balance(#[case] amount: Money) {
        let mut ledger = ledger();
        let account = ledger.register_account("+992000000001").unwrap();
        ledger.deposit(account.id, 500).unwrap();

        let result = ledger.deposit(account.id, amount);

        assert_eq!(result.unwrap_err(), LedgerError::amount_must_be_positive(amount));
        assert_eq!(ledger.find_account_by_id(account.id).unwrap().balance, 500);
    }

    #[test]
    fn test_deposit_unknown_account() {
        let mut ledger = ledger();
        let result = ledger.deposit(7, 100);
        assert_eq!(result.unwrap_err(), LedgerError::account_not_found(7));
    }

    #[test]
    fn test_deposit_overflow_leaves_balance() {
        let mut ledger = ledger();
        let account = ledger.register_account("+992000000001").unwrap();
        ledger.deposit(account.id, Money::MAX).unwrap();

        let result = ledger.deposit(account.id, 1);

        assert_eq!(
            result.unwrap_err(),
            LedgerError::BalanceOverflow { account_id: account.id }
        );
        assert_eq!(ledger.find_account_by_id(account.id).unwrap().balance, Money::MAX);
    }

    #[test]
    fn test_pay_debits_and_records_payment() {
        let (ledger, account, payment) = ledger_with_payment(10_000_00);

        assert_eq!(payment.id, "id-1");
        assert_eq!(payment.account_id, account.id);
        assert_eq!(payment.amount, 1_000_00);
        assert_eq!(payment.category, "auto");
        assert_eq!(payment.status, PaymentStatus::InProgress);
        assert_eq!(ledger.payments(), &[payment.clone()]);
        assert_eq!(ledger.find_account_by_id(account.id).unwrap().balance, 9_000_00);
    }

    #[test]
    fn test_pay_more_than_balance_leaves_balance() {
        let mut ledger = ledger();
        let account = ledger.register_account("+992000000001").unwrap();
        ledger.deposit(account.id, 100).unwrap();

        let result = ledger.pay(account.id, 101, "auto");

        assert_eq!(
            result.unwrap_err(),
            LedgerError::not_enough_balance(account.id, 100, 101)
        );
        assert_eq!(ledger.find_account_by_id(account.id).unwrap().balance, 100);
        assert!(ledger.payments().is_empty());
    }

    #[rstest]
    #[case::zero(0)]
    #[case::negative(-1)]
    fn test_pay_non_positive_amount(#[case] amount: Money) {
        let mut ledger = ledger();
        let account = ledger.register_account("+992000000001").unwrap();
        ledger.deposit(account.id, 100).unwrap();

        let result = ledger.pay(account.id, amount, "auto");

        assert_eq!(result.unwrap_err(), LedgerError::amount_must_be_positive(amount));
        assert_eq!(ledger.find_account_by_id(account.id).unwrap().balance, 100);
    }

    #[test]
    fn test_pay_unknown_account() {
        let mut ledger = ledger();
        let result = ledger.pay(3, 10, "auto");
        assert_eq!(result.unwrap_err(), LedgerError::account_not_found(3));
    }

    #[test]
    fn test_find_payment_by_id() {
        let (ledger, _, payment) = ledger_with_payment(10_000_00);

        assert_eq!(ledger.find_payment_by_id(&payment.id).unwrap(), &payment);
        assert_eq!(
            ledger.find_payment_by_id("missing").unwrap_err(),
            LedgerError::payment_not_found("missing")
        );
    }

    #[test]
    fn test_reject_sets_fail_and_refunds() {
        let (mut ledger, account, payment) = ledger_with_payment(10_000_00);

        ledger.reject(&payment.id).unwrap();

        let saved = ledger.find_payment_by_id(&payment.id).unwrap();
        assert_eq!(saved.status, PaymentStatus::Fail);
        assert_eq!(ledger.find_account_by_id(account.id).unwrap().balance, 10_000_00);
    }

    #[test]
    fn test_reject_twice_credits_once() {
        let (mut ledger, account, payment) = ledger_with_payment(10_000_00);
        ledger.reject(&payment.id).unwrap();

        let second = ledger.reject(&payment.id);

        assert_eq!(second.unwrap_err(), LedgerError::payment_already_failed(&payment.id));
        assert_eq!(ledger.find_account_by_id(account.id).unwrap().balance, 10_000_00);
        assert_eq!(
            ledger.find_payment_by_id(&payment.id).unwrap().status,
            PaymentStatus::Fail
        );
    }

    #[test]
    fn test_reject_unknown_payment() {
        let (mut ledger, account, _) = ledger_with_payment(10_000_00);

        let result = ledger.reject("unknown");

        assert_eq!(result.unwrap_err(), LedgerError::payment_not_found("unknown"));
        assert_eq!(ledger.find_account_by_id(account.id).unwrap().balance, 9_000_00);
    }

    #[test]
    fn test_no_operation_reaches_status_ok() {
        let (mut ledger, _, payment) = ledger_with_payment(10_000_00);
        ledger.repeat(&payment.id).unwrap();
        ledger.reject(&payment.id).unwrap();

        assert!(ledger
            .payments()
            .iter()
            .all(|p| p.status != PaymentStatus::Ok));
    }

    #[test]
    fn test_repeat_creates_new_payment() {
        let (mut ledger, account, payment) = ledger_with_payment(10_000_00);

        let repeated = ledger.repeat(&payment.id).unwrap();

        assert_ne!(repeated.id, payment.id);
        assert_eq!(repeated.account_id, payment.account_id);
        assert_eq!(repeated.amount, payment.amount);
        assert_eq!(repeated.category, payment.category);
        assert_eq!(repeated.status, PaymentStatus::InProgress);
        assert_eq!(ledger.payments().len(), 2);
        assert_eq!(ledger.find_account_by_id(account.id).unwrap().balance, 8_000_00);
    }

    #[test]
    fn test_repeat_without_balance_fails() {
        let (mut ledger, account, payment) = ledger_with_payment(1_000_00);

        let result = ledger.repeat(&payment.id);

        assert_eq!(
            result.unwrap_err(),
            LedgerError::not_enough_balance(account.id, 0, 1_000_00)
        );
        assert_eq!(ledger.payments().len(), 1);
    }

    #[test]
    fn test_favorite_snapshots_payment() {
        let (mut ledger, account, payment) = ledger_with_payment(10_000_00);

        let favorite = ledger.favorite_payment(&payment.id, "fuel").unwrap();

        assert_eq!(favorite.id, "id-2");
        assert_eq!(favorite.account_id, account.id);
        assert_eq!(favorite.name, "fuel");
        assert_eq!(favorite.amount, payment.amount);
        assert_eq!(favorite.category, payment.category);
        assert_eq!(ledger.find_favorite_by_id(&favorite.id).unwrap(), &favorite);
    }

    #[test]
    fn test_favorite_unknown_payment() {
        let mut ledger = ledger();
        let result = ledger.favorite_payment("nope", "fuel");
        assert_eq!(result.unwrap_err(), LedgerError::payment_not_found("nope"));
        assert!(ledger.favorites().is_empty());
    }

    #[test]
    fn test_pay_from_favorite() {
        let (mut ledger, account, payment) = ledger_with_payment(10_000_00);
        let favorite = ledger.favorite_payment(&payment.id, "fuel").unwrap();

        let paid = ledger.pay_from_favorite(&favorite.id).unwrap();

        assert_eq!(paid.amount, favorite.amount);
        assert_eq!(paid.category, favorite.category);
        assert_eq!(ledger.find_account_by_id(account.id).unwrap().balance, 8_000_00);
        assert_eq!(
            ledger.pay_from_favorite("missing").unwrap_err(),
            LedgerError::favorite_not_found("missing")
        );
    }

    #[test]
    fn test_merge_account_overwrites_by_id() {
        let mut ledger = ledger();
        ledger.register_account("+992000000001").unwrap();

        let outcome = ledger.merge_account(Account {
            id: 1,
            phone: "+992000000009".to_string(),
            balance: 77,
        });

        assert_eq!(outcome, MergeOutcome::Updated);
        assert_eq!(ledger.accounts().len(), 1);
        assert_eq!(ledger.accounts()[0].phone, "+992000000009");
        assert_eq!(ledger.accounts()[0].balance, 77);
    }

    #[test]
    fn test_merge_account_advances_counter() {
        let mut ledger = ledger();

        let outcome = ledger.merge_account(Account::new(5, "+992000000005"));
        let registered = ledger.register_account("+992000000006").unwrap();

        assert_eq!(outcome, MergeOutcome::Inserted);
        assert_eq!(registered.id, 6);
    }

    #[test]
    fn test_merge_account_rejects_phone_of_other_id() {
        let mut ledger = ledger();
        ledger.register_account("+992000000001").unwrap();
        ledger.register_account("+992000000002").unwrap();

        let inserted = ledger.merge_account(Account::new(5, "+992000000001"));
        let overwritten = ledger.merge_account(Account::new(2, "+992000000001"));

        let rejected = MergeOutcome::Rejected(LedgerError::phone_already_registered("+992000000001"));
        assert_eq!(inserted, rejected);
        assert_eq!(overwritten, rejected);
        assert_eq!(ledger.accounts().len(), 2);
        assert_eq!(ledger.accounts()[1].phone, "+992000000002");
        assert_eq!(ledger.last_account_id(), 2);
    }

    #[test]
    fn test_append_account_keeps_duplicates() {
        let mut ledger = ledger();
        ledger.register_account("+992000000001").unwrap();

        ledger.append_account(Account::new(1, "+992000000001"));

        assert_eq!(ledger.accounts().len(), 2);
        assert_eq!(ledger.last_account_id(), 1);
    }

    #[test]
    fn test_merge_payment_and_favorite() {
        let (mut ledger, _, payment) = ledger_with_payment(10_000_00);

        let mut updated = payment.clone();
        updated.status = PaymentStatus::Ok;
        assert_eq!(ledger.merge_payment(updated), MergeOutcome::Updated);
        assert_eq!(ledger.payments()[0].status, PaymentStatus::Ok);

        let favorite = Favorite {
            id: "fav".to_string(),
            account_id: 1,
            name: "fuel".to_string(),
            amount: 5,
            category: "auto".to_string(),
        };
        assert_eq!(ledger.merge_favorite(favorite.clone()), MergeOutcome::Inserted);
        let mut renamed = favorite;
        renamed.name = "gas".to_string();
        assert_eq!(ledger.merge_favorite(renamed), MergeOutcome::Updated);
        assert_eq!(ledger.favorites().len(), 1);
        assert_eq!(ledger.favorites()[0].name, "gas");
    }

    #[test]
    fn test_mutation_does_not_disturb_scan_snapshot() {
        let (mut ledger, account, _) = ledger_with_payment(10_000_00);
        let snapshot = ledger.shared_payments();

        ledger.pay(account.id, 10, "food").unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(ledger.payments().len(), 2);
    }
}
