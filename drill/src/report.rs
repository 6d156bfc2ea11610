use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::outcome::Outcome;
use crate::run::CaseReport;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub cases: usize,
    pub pass: usize,
    pub fail: usize,
    pub expected_failure: usize,
    pub unexpected_success: usize,
    pub timed_out: usize,
    pub error: usize,
}

impl ReportSummary {
    /// True when no case failed the run.
    pub fn succeeded(&self) -> bool {
        self.fail + self.timed_out + self.error == 0
    }
}

pub fn summarize(reports: &[CaseReport]) -> ReportSummary {
    let mut summary = ReportSummary::default();
    for report in reports {
        summary.cases += 1;
        match report.outcome {
            Outcome::Pass => summary.pass += 1,
            Outcome::Fail => summary.fail += 1,
            Outcome::ExpectedFailure => summary.expected_failure += 1,
            Outcome::UnexpectedSuccess => summary.unexpected_success += 1,
            Outcome::TimedOut => summary.timed_out += 1,
            Outcome::Error => summary.error += 1,
        }
    }
    summary
}

#[derive(Serialize)]
struct ReportFile<'a> {
    summary: &'a ReportSummary,
    cases: &'a [CaseReport],
}

/// Write the summary and every case report as pretty JSON.
pub fn write_report(path: &Path, summary: &ReportSummary, cases: &[CaseReport]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let contents =
        serde_json::to_string_pretty(&ReportFile { summary, cases }).context("serialize report")?;
    fs::write(path, format!("{contents}\n")).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, outcome: Outcome) -> CaseReport {
        CaseReport {
            id: id.to_string(),
            bonus: matches!(
                outcome,
                Outcome::ExpectedFailure | Outcome::UnexpectedSuccess
            ),
            outcome,
            duration_ms: 3,
            checks: Vec::new(),
        }
    }

    #[test]
    fn counts_each_outcome() {
        let reports = vec![
            report("a", Outcome::Pass),
            report("b", Outcome::Pass),
            report("c", Outcome::ExpectedFailure),
            report("d", Outcome::UnexpectedSuccess),
        ];
        let summary = summarize(&reports);
        assert_eq!(
            summary,
            ReportSummary {
                cases: 4,
                pass: 2,
                expected_failure: 1,
                unexpected_success: 1,
                ..ReportSummary::default()
            }
        );
        assert!(summary.succeeded());
    }

    #[test]
    fn any_failure_kind_fails_the_run() {
        for outcome in [Outcome::Fail, Outcome::TimedOut, Outcome::Error] {
            let summary = summarize(&[report("a", Outcome::Pass), report("b", outcome)]);
            assert!(!summary.succeeded(), "{outcome} should fail the run");
        }
    }

    #[test]
    fn writes_report_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out").join("report.json");
        let reports = vec![report("ranges", Outcome::Pass)];
        write_report(&path, &summarize(&reports), &reports).expect("write");

        let contents = fs::read_to_string(&path).expect("read");
        let value: serde_json::Value = serde_json::from_str(&contents).expect("json");
        assert_eq!(value["summary"]["pass"], 1);
        assert_eq!(value["cases"][0]["id"], "ranges");
        assert_eq!(value["cases"][0]["outcome"], "pass");
    }
}
