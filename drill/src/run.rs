//! Case execution.

use std::time::{Duration, Instant};

use kata::io::config::KataConfig;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::case::CaseFile;
use crate::judge::{CheckLimits, CheckResult, run_check};
use crate::outcome::{Outcome, classify_outcome};

/// Result of running a single case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub id: String,
    pub bonus: bool,
    pub outcome: Outcome,
    pub duration_ms: u64,
    pub checks: Vec<CheckResult>,
}

/// Run every check of a case, in order, each under its own timeout.
#[instrument(skip_all, fields(case_id = %case.case.id))]
pub fn run_case(case: &CaseFile, cfg: &KataConfig) -> CaseReport {
    let limits = CheckLimits {
        timeout: case
            .case
            .timeout_ms
            .map_or_else(|| cfg.timeout(), Duration::from_millis),
        max_range_values: cfg.ranges.max_values,
    };
    info!(checks = case.checks.len(), timeout_ms = limits.timeout.as_millis() as u64, "case started");

    let started = Instant::now();
    let checks: Vec<CheckResult> = case
        .checks
        .iter()
        .map(|check| run_check(check, limits))
        .collect();
    let duration_ms = started.elapsed().as_millis() as u64;

    let outcome = classify_outcome(case.case.bonus, &checks);
    if outcome.is_failure() {
        warn!(%outcome, duration_ms, "case failed");
    } else {
        info!(%outcome, duration_ms, "case finished");
    }
    CaseReport {
        id: case.case.id.clone(),
        bonus: case.case.bonus,
        outcome,
        duration_ms,
        checks,
    }
}
