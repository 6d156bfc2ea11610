use std::fmt;

use serde::{Deserialize, Serialize};

use crate::judge::{CheckResult, CheckStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
    /// A bonus case failed, timed out or errored.
    ExpectedFailure,
    /// A bonus case passed; reported but never a failure.
    UnexpectedSuccess,
    TimedOut,
    Error,
}

impl Outcome {
    /// True if this outcome should fail the run.
    pub fn is_failure(self) -> bool {
        matches!(self, Outcome::Fail | Outcome::TimedOut | Outcome::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Pass => "pass",
            Outcome::Fail => "fail",
            Outcome::ExpectedFailure => "expected_failure",
            Outcome::UnexpectedSuccess => "unexpected_success",
            Outcome::TimedOut => "timed_out",
            Outcome::Error => "error",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_outcome(bonus: bool, checks: &[CheckResult]) -> Outcome {
    let has = |status: CheckStatus| checks.iter().any(|check| check.status == status);
    let all_passed = checks
        .iter()
        .all(|check| check.status == CheckStatus::Passed);

    match (bonus, all_passed) {
        (true, true) => Outcome::UnexpectedSuccess,
        (true, false) => Outcome::ExpectedFailure,
        (false, true) => Outcome::Pass,
        (false, false) if has(CheckStatus::Errored) => Outcome::Error,
        (false, false) if has(CheckStatus::TimedOut) => Outcome::TimedOut,
        (false, false) => Outcome::Fail,
    }
}
