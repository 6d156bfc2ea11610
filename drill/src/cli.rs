//! CLI command implementations.

use std::path::Path;

use anyhow::{Result, bail};
use kata::io::config::KataConfig;
use tracing::{debug, info};

use crate::case::discover_cases;
use crate::judge::CheckStatus;
use crate::report::{summarize, write_report};
use crate::run::{CaseReport, run_case};

/// List all available cases.
pub fn list_cases(cases_dir: &Path) -> Result<()> {
    for case in discover_cases(cases_dir)? {
        if case.case.bonus {
            println!("{} (bonus)", case.case.id);
        } else {
            println!("{}", case.case.id);
        }
    }
    Ok(())
}

/// Run one case, or every case when `case_id` is `None`.
///
/// Returns `false` when any non-bonus case failed, timed out or errored.
pub fn run_cases(
    cases_dir: &Path,
    case_id: Option<&str>,
    cfg: &KataConfig,
    json: Option<&Path>,
) -> Result<bool> {
    let mut cases = discover_cases(cases_dir)?;
    if let Some(case_id) = case_id {
        cases.retain(|case| case.case.id == case_id);
        if cases.is_empty() {
            bail!("case {} not found in {}", case_id, cases_dir.display());
        }
    } else if cases.is_empty() {
        bail!("no cases found in {}", cases_dir.display());
    }
    debug!(count = cases.len(), "cases loaded");

    let mut reports = Vec::with_capacity(cases.len());
    for case in &cases {
        let report = run_case(case, cfg);
        print_case(&report);
        reports.push(report);
    }

    let summary = summarize(&reports);
    println!(
        "report: cases={} pass={} fail={} expected_failure={} unexpected_success={} timed_out={} error={}",
        summary.cases,
        summary.pass,
        summary.fail,
        summary.expected_failure,
        summary.unexpected_success,
        summary.timed_out,
        summary.error
    );
    if let Some(path) = json {
        write_report(path, &summary, &reports)?;
        info!(path = %path.display(), "report written");
    }
    Ok(summary.succeeded())
}

fn print_case(report: &CaseReport) {
    let passed = report
        .checks
        .iter()
        .filter(|check| check.status == CheckStatus::Passed)
        .count();
    println!(
        "run: case={} outcome={} checks={}/{} duration_ms={}",
        report.id,
        report.outcome,
        passed,
        report.checks.len(),
        report.duration_ms
    );
    for (index, check) in report.checks.iter().enumerate() {
        if check.status == CheckStatus::Passed {
            continue;
        }
        println!(
            "  checks[{}] {}: {:?} {}",
            index,
            check.label,
            check.status,
            check.detail.as_deref().unwrap_or_default()
        );
    }
}
