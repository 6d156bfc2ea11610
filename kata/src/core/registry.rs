//! Registry of opened accounts with unique account numbers.
//!
//! The registry is an explicit value: callers that want one construct it and
//! pass it around. Accounts live inside the registry and are mutated through
//! it, so `accounts()` always reflects the latest balances.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::account::{Account, ValidationError};

/// Identifier assigned by [`AccountRegistry::open`]. Unique within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AccountNumber(u64);

impl AccountNumber {
    /// Refer to an account by its raw number, e.g. one read from a file.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown account {0}")]
    UnknownAccount(AccountNumber),
    #[error("cannot transfer from account {0} to itself")]
    SameAccount(AccountNumber),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Accounts in creation order. Account `n` is stored at index `n - 1`.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new account and return its number.
    pub fn open(&mut self, balance: i64) -> Result<AccountNumber, ValidationError> {
        let account = Account::new(balance)?;
        self.accounts.push(account);
        let number = AccountNumber(self.accounts.len() as u64);
        debug!(%number, balance, "account opened");
        Ok(number)
    }

    pub fn get(&self, number: AccountNumber) -> Option<&Account> {
        self.index(number).map(|index| &self.accounts[index])
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All accounts with their numbers, oldest first.
    pub fn accounts(&self) -> impl Iterator<Item = (AccountNumber, &Account)> + '_ {
        self.accounts
            .iter()
            .enumerate()
            .map(|(index, account)| (AccountNumber(index as u64 + 1), account))
    }

    pub fn deposit(&mut self, number: AccountNumber, amount: i64) -> Result<(), RegistryError> {
        self.get_mut(number)?.deposit(amount)?;
        Ok(())
    }

    pub fn withdraw(&mut self, number: AccountNumber, amount: i64) -> Result<(), RegistryError> {
        self.get_mut(number)?.withdraw(amount)?;
        Ok(())
    }

    /// Transfer between two distinct registered accounts.
    pub fn transfer(
        &mut self,
        from: AccountNumber,
        to: AccountNumber,
        amount: i64,
    ) -> Result<(), RegistryError> {
        let from_index = self
            .index(from)
            .ok_or(RegistryError::UnknownAccount(from))?;
        let to_index = self.index(to).ok_or(RegistryError::UnknownAccount(to))?;
        if from_index == to_index {
            return Err(RegistryError::SameAccount(from));
        }

        // Split so both accounts can be borrowed mutably at once.
        let (source, target) = if from_index < to_index {
            let (head, tail) = self.accounts.split_at_mut(to_index);
            (&mut head[from_index], &mut tail[0])
        } else {
            let (head, tail) = self.accounts.split_at_mut(from_index);
            (&mut tail[0], &mut head[to_index])
        };
        source.transfer(target, amount)?;
        debug!(%from, %to, amount, "transfer applied");
        Ok(())
    }

    fn get_mut(&mut self, number: AccountNumber) -> Result<&mut Account, RegistryError> {
        let index = self
            .index(number)
            .ok_or(RegistryError::UnknownAccount(number))?;
        Ok(&mut self.accounts[index])
    }

    fn index(&self, number: AccountNumber) -> Option<usize> {
        let index = usize::try_from(number.0).ok()?.checked_sub(1)?;
        (index < self.accounts.len()).then_some(index)
    }
}
