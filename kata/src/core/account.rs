//! Bank account value object with balance invariants.
//!
//! The balance is never negative after a successful operation. Every
//! operation validates its inputs before mutating anything, so a rejected
//! call leaves the account exactly as it was.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Rejected account operation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("cannot open an account with negative balance {balance}")]
    NegativeOpeningBalance { balance: i64 },
    #[error("cannot {operation} negative amount {amount}")]
    NegativeAmount {
        operation: &'static str,
        amount: i64,
    },
    #[error("cannot withdraw {requested}: balance is only {available}")]
    InsufficientFunds { requested: i64, available: i64 },
    #[error("depositing {amount} would overflow balance {balance}")]
    Overflow { balance: i64, amount: i64 },
}

/// An account holding a non-negative balance in whole currency units.
///
/// The balance is read-only from outside; it changes only through
/// [`deposit`](Account::deposit), [`withdraw`](Account::withdraw) and
/// [`transfer`](Account::transfer).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Account {
    balance: i64,
}

impl Account {
    /// Open an account with `balance`.
    pub fn new(balance: i64) -> Result<Self, ValidationError> {
        if balance < 0 {
            debug!(balance, "rejecting negative opening balance");
            return Err(ValidationError::NegativeOpeningBalance { balance });
        }
        Ok(Self { balance })
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn deposit(&mut self, amount: i64) -> Result<(), ValidationError> {
        ensure_non_negative("deposit", amount)?;
        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            debug!(balance = self.balance, amount, "deposit overflow");
            ValidationError::Overflow {
                balance: self.balance,
                amount,
            }
        })?;
        Ok(())
    }

    /// Withdraw `amount`; overdrafts are rejected.
    pub fn withdraw(&mut self, amount: i64) -> Result<(), ValidationError> {
        ensure_non_negative("withdraw", amount)?;
        if amount > self.balance {
            debug!(balance = self.balance, amount, "insufficient funds");
            return Err(ValidationError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Move `amount` from this account into `target`.
    ///
    /// Runs as two steps: a withdrawal here, then a deposit on `target`. A
    /// failed withdrawal skips the deposit. If the deposit fails the
    /// withdrawal is undone, so either both balances change or neither does.
    pub fn transfer(&mut self, target: &mut Account, amount: i64) -> Result<(), ValidationError> {
        ensure_non_negative("transfer", amount)?;
        self.withdraw(amount)?;
        if let Err(err) = target.deposit(amount) {
            // Cannot overflow: the same amount left this balance a moment ago.
            self.balance += amount;
            return Err(err);
        }
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account(balance={})", self.balance)
    }
}

fn ensure_non_negative(operation: &'static str, amount: i64) -> Result<(), ValidationError> {
    if amount < 0 {
        debug!(operation, amount, "rejecting negative amount");
        return Err(ValidationError::NegativeAmount { operation, amount });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_account_starts_empty() {
        assert_eq!(Account::default().balance(), 0);
    }

    #[test]
    fn opening_balance_is_kept() {
        let account = Account::new(100).expect("open");
        assert_eq!(account.balance(), 100);
    }

    #[test]
    fn negative_opening_balance_is_rejected() {
        let err = Account::new(-10).expect_err("negative balance");
        assert_eq!(err, ValidationError::NegativeOpeningBalance { balance: -10 });
    }

    #[test]
    fn deposit_and_withdraw_adjust_balance() {
        let mut account = Account::default();
        account.deposit(100).expect("deposit");
        assert_eq!(account.balance(), 100);
        account.withdraw(40).expect("withdraw");
        assert_eq!(account.balance(), 60);
    }

    #[test]
    fn display_renders_current_balance() {
        let mut account = Account::default();
        assert_eq!(account.to_string(), "Account(balance=0)");
        account.deposit(200).expect("deposit");
        assert_eq!(account.to_string(), "Account(balance=200)");
    }

    #[test]
    fn rejected_operations_leave_balance_untouched() {
        let mut account = Account::new(100).expect("open");

        assert!(matches!(
            account.deposit(-10),
            Err(ValidationError::NegativeAmount {
                operation: "deposit",
                ..
            })
        ));
        assert_eq!(
            account.withdraw(101),
            Err(ValidationError::InsufficientFunds {
                requested: 101,
                available: 100,
            })
        );
        assert!(account.withdraw(-1).is_err());
        assert_eq!(account.balance(), 100);
    }

    #[test]
    fn deposit_overflow_is_rejected() {
        let mut account = Account::new(i64::MAX).expect("open");
        assert!(matches!(
            account.deposit(1),
            Err(ValidationError::Overflow { .. })
        ));
        assert_eq!(account.balance(), i64::MAX);
    }

    #[test]
    fn transfer_moves_funds_between_accounts() {
        let mut mary = Account::new(100).expect("open");
        let mut dana = Account::default();

        mary.transfer(&mut dana, 20).expect("transfer");

        assert_eq!((mary.balance(), dana.balance()), (80, 20));
    }

    #[test]
    fn transfer_validation_matches_withdraw_and_deposit() {
        let mut mary = Account::new(100).expect("open");
        let mut dana = Account::default();

        assert!(mary.transfer(&mut dana, 101).is_err());
        assert!(mary.transfer(&mut dana, -5).is_err());
        assert_eq!((mary.balance(), dana.balance()), (100, 0));

        mary.transfer(&mut dana, 100).expect("transfer everything");
        assert_eq!((mary.balance(), dana.balance()), (0, 100));

        dana.transfer(&mut mary, 10).expect("transfer partial");
        assert_eq!((mary.balance(), dana.balance()), (10, 90));

        assert!(mary.transfer(&mut dana, -5).is_err());
        assert_eq!((mary.balance(), dana.balance()), (10, 90));
    }

    #[test]
    fn transfer_rolls_back_when_target_overflows() {
        let mut source = Account::new(10).expect("open");
        let mut target = Account::new(i64::MAX).expect("open");

        assert!(matches!(
            source.transfer(&mut target, 5),
            Err(ValidationError::Overflow { .. })
        ));
        assert_eq!(source.balance(), 10);
        assert_eq!(target.balance(), i64::MAX);
    }
}
