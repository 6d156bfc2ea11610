//! Check execution.
//!
//! Each check runs on a worker thread under the case's wall-clock budget, so
//! a runaway computation is reported as `timed_out` instead of hanging the
//! harness.

use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

use kata::core::account::Account;
use kata::core::flatten::{Nested, deep_flatten};
use kata::core::fuzzy::FuzzyString;
use kata::core::ranges::RangeParser;
use kata::core::registry::{AccountNumber, AccountRegistry, RegistryError};
use kata::io::timeout::{TimeoutError, with_timeout};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::case::{Check, ExpectedOrdering, RegistryOp};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed,
    TimedOut,
    Errored,
}

/// Result of running a single check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResult {
    pub label: String,
    pub status: CheckStatus,
    /// Mismatch or error description; absent when the check passed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Limits applied to every check in a run.
#[derive(Debug, Clone, Copy)]
pub struct CheckLimits {
    pub timeout: Duration,
    /// Upper bound on values a `ranges` check may expand to.
    pub max_range_values: usize,
}

#[instrument(skip_all, fields(check = check.label()))]
pub fn run_check(check: &Check, limits: CheckLimits) -> CheckResult {
    let owned = check.clone();
    let max_range_values = limits.max_range_values;
    let verdict = with_timeout(limits.timeout, move || evaluate(owned, max_range_values));

    let (status, detail) = match verdict {
        Ok(Ok(())) => (CheckStatus::Passed, None),
        Ok(Err(mismatch)) => (CheckStatus::Failed, Some(mismatch)),
        Err(err @ TimeoutError::TimedOut(_)) => {
            warn!("check timed out");
            (CheckStatus::TimedOut, Some(err.to_string()))
        }
        Err(err) => (CheckStatus::Errored, Some(err.to_string())),
    };
    debug!(?status, "check result");
    CheckResult {
        label: check.label().to_string(),
        status,
        detail,
    }
}

/// `Err` carries a human-readable mismatch.
fn evaluate(check: Check, max_range_values: usize) -> Result<(), String> {
    match check {
        Check::Ranges {
            input,
            arrows,
            expect,
            ..
        } => {
            let parser = RangeParser::new().arrows(arrows);
            let values = parser
                .parse(&input)
                .take(max_range_values.saturating_add(1))
                .collect::<Result<Vec<i64>, _>>();
            if let Ok(values) = &values
                && values.len() > max_range_values
            {
                return Err(format!("expands to more than {max_range_values} values"));
            }
            expect_outcome(values, expect)
        }
        Check::Flatten { input, expect } => {
            let input: serde_json::Value =
                serde_json::from_str(&input).map_err(|err| format!("input: {err}"))?;
            let expect: serde_json::Value =
                serde_json::from_str(&expect).map_err(|err| format!("expect: {err}"))?;
            let flat = serde_json::Value::Array(deep_flatten(Nested::from(input)).collect());
            expect_value(flat, expect)
        }
        Check::FuzzyEq {
            left,
            right,
            mode,
            expect,
        } => {
            let left = FuzzyString::with_mode(left, mode);
            expect_value(left.equals(&right), expect)
        }
        Check::FuzzyCmp {
            left,
            right,
            mode,
            expect,
        } => {
            let actual = match FuzzyString::with_mode(left, mode).compare(&right) {
                Ordering::Less => ExpectedOrdering::Less,
                Ordering::Equal => ExpectedOrdering::Equal,
                Ordering::Greater => ExpectedOrdering::Greater,
            };
            expect_value(actual, expect)
        }
        Check::FuzzyContains {
            haystack,
            needle,
            mode,
            expect,
        } => expect_value(
            FuzzyString::with_mode(haystack, mode).contains(&needle),
            expect,
        ),
        Check::Transfer {
            from,
            to,
            amount,
            expect,
            ..
        } => {
            let balances = Account::new(from).and_then(|mut source| {
                let mut target = Account::new(to)?;
                source.transfer(&mut target, amount)?;
                Ok([source.balance(), target.balance()])
            });
            expect_outcome(balances, expect)
        }
        Check::Registry { open, ops, expect } => {
            let mut registry = AccountRegistry::new();
            for (index, balance) in open.into_iter().enumerate() {
                registry
                    .open(balance)
                    .map_err(|err| format!("open[{index}]: {err}"))?;
            }
            for (index, op) in ops.into_iter().enumerate() {
                match apply_registry_op(&mut registry, op) {
                    (Ok(()), true) => return Err(format!("ops[{index}]: expected an error")),
                    (Err(err), false) => {
                        return Err(format!("ops[{index}]: unexpected error: {err}"));
                    }
                    (Ok(()), false) | (Err(_), true) => {}
                }
            }
            let balances: Vec<i64> = registry
                .accounts()
                .map(|(_, account)| account.balance())
                .collect();
            expect_value(balances, expect)
        }
    }
}

/// Apply `op` and pair its result with whether an error was expected.
fn apply_registry_op(
    registry: &mut AccountRegistry,
    op: RegistryOp,
) -> (Result<(), RegistryError>, bool) {
    match op {
        RegistryOp::Deposit {
            account,
            amount,
            expect_error,
        } => (
            registry.deposit(AccountNumber::new(account), amount),
            expect_error,
        ),
        RegistryOp::Withdraw {
            account,
            amount,
            expect_error,
        } => (
            registry.withdraw(AccountNumber::new(account), amount),
            expect_error,
        ),
        RegistryOp::Transfer {
            from,
            to,
            amount,
            expect_error,
        } => (
            registry.transfer(AccountNumber::new(from), AccountNumber::new(to), amount),
            expect_error,
        ),
    }
}

fn expect_value<T: PartialEq + fmt::Debug>(actual: T, expected: T) -> Result<(), String> {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {actual:?}"))
    }
}

/// `expected == None` means the operation must fail.
fn expect_outcome<T, E>(actual: Result<T, E>, expected: Option<T>) -> Result<(), String>
where
    T: PartialEq + fmt::Debug,
    E: fmt::Display,
{
    match (actual, expected) {
        (Ok(actual), Some(expected)) => expect_value(actual, expected),
        (Ok(actual), None) => Err(format!("expected an error, got {actual:?}")),
        (Err(err), Some(_)) => Err(format!("unexpected error: {err}")),
        (Err(_), None) => Ok(()),
    }
}
