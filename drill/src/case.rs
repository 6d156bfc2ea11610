//! Case file parsing and validation.
//!
//! Cases are TOML files listing checks against the kata library.
//! See `drill/cases/` for examples.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use kata::core::fuzzy::FoldMode;
use kata::core::ranges::ArrowPolicy;
use serde::Deserialize;

/// A parsed case file: metadata plus the checks to run.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CaseFile {
    pub case: CaseMeta,
    #[serde(default)]
    pub checks: Vec<Check>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CaseMeta {
    /// Unique identifier (slug format: `[a-z0-9_-]+`).
    pub id: String,
    /// Failures of a bonus case are expected and never fail the run.
    #[serde(default)]
    pub bonus: bool,
    /// Per-check wall-clock budget, overriding the harness default.
    pub timeout_ms: Option<u64>,
}

/// Expected ordering for `fuzzy_cmp`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedOrdering {
    Less,
    Equal,
    Greater,
}

/// One assertion against the library.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    /// Expand range notation and compare the values.
    Ranges {
        input: String,
        #[serde(default)]
        arrows: ArrowPolicy,
        expect: Option<Vec<i64>>,
        #[serde(default)]
        expect_error: bool,
    },
    /// Flatten a JSON array; `input` and `expect` hold JSON text.
    Flatten { input: String, expect: String },
    FuzzyEq {
        left: String,
        right: String,
        #[serde(default)]
        mode: FoldMode,
        expect: bool,
    },
    FuzzyCmp {
        left: String,
        right: String,
        #[serde(default)]
        mode: FoldMode,
        expect: ExpectedOrdering,
    },
    FuzzyContains {
        haystack: String,
        needle: String,
        #[serde(default)]
        mode: FoldMode,
        expect: bool,
    },
    /// Transfer between two fresh accounts and compare both balances.
    Transfer {
        from: i64,
        to: i64,
        amount: i64,
        expect: Option<[i64; 2]>,
        #[serde(default)]
        expect_error: bool,
    },
    /// Open registry accounts, apply operations, compare the final balances.
    Registry {
        /// Opening balances; account numbers are assigned from 1 in this order.
        #[serde(default)]
        open: Vec<i64>,
        #[serde(default)]
        ops: Vec<RegistryOp>,
        /// Final balances in account-number order.
        expect: Vec<i64>,
    },
}

/// One registry operation; accounts are referenced by number.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RegistryOp {
    Deposit {
        account: u64,
        amount: i64,
        #[serde(default)]
        expect_error: bool,
    },
    Withdraw {
        account: u64,
        amount: i64,
        #[serde(default)]
        expect_error: bool,
    },
    Transfer {
        from: u64,
        to: u64,
        amount: i64,
        #[serde(default)]
        expect_error: bool,
    },
}

impl CaseFile {
    /// Load and validate a case file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read case {}", path.display()))?;
        Self::parse_str(&contents).with_context(|| format!("load case {}", path.display()))
    }

    pub fn parse_str(contents: &str) -> Result<Self> {
        let case: CaseFile = toml::from_str(contents).context("parse case")?;
        case.validate()?;
        Ok(case)
    }

    fn validate(&self) -> Result<()> {
        validate_case_id(&self.case.id)?;
        if self.case.timeout_ms == Some(0) {
            bail!("case.timeout_ms must be > 0");
        }
        if self.checks.is_empty() {
            bail!("checks must be a non-empty array");
        }
        for (index, check) in self.checks.iter().enumerate() {
            check
                .validate()
                .with_context(|| format!("checks[{}] invalid", index))?;
        }
        Ok(())
    }
}

impl Check {
    /// Short name used in reports and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Check::Ranges { .. } => "ranges",
            Check::Flatten { .. } => "flatten",
            Check::FuzzyEq { .. } => "fuzzy_eq",
            Check::FuzzyCmp { .. } => "fuzzy_cmp",
            Check::FuzzyContains { .. } => "fuzzy_contains",
            Check::Transfer { .. } => "transfer",
            Check::Registry { .. } => "registry",
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Check::Ranges {
                expect,
                expect_error,
                ..
            } => require_one_expectation("ranges", expect.is_some(), *expect_error),
            Check::Flatten { input, expect } => {
                serde_json::from_str::<serde_json::Value>(input)
                    .context("flatten.input must be valid JSON")?;
                let expect: serde_json::Value =
                    serde_json::from_str(expect).context("flatten.expect must be valid JSON")?;
                if !expect.is_array() {
                    bail!("flatten.expect must be a JSON array");
                }
                Ok(())
            }
            Check::FuzzyEq { .. } | Check::FuzzyCmp { .. } | Check::FuzzyContains { .. } => Ok(()),
            Check::Transfer {
                expect,
                expect_error,
                ..
            } => require_one_expectation("transfer", expect.is_some(), *expect_error),
            Check::Registry { open, expect, .. } => {
                if open.len() != expect.len() {
                    bail!(
                        "registry: expect lists {} balances for {} opened accounts",
                        expect.len(),
                        open.len()
                    );
                }
                Ok(())
            }
        }
    }
}

fn require_one_expectation(kind: &str, has_expect: bool, expect_error: bool) -> Result<()> {
    match (has_expect, expect_error) {
        (true, false) | (false, true) => Ok(()),
        (true, true) => bail!("{kind}: expect and expect_error are mutually exclusive"),
        (false, false) => bail!("{kind}: one of expect or expect_error is required"),
    }
}

/// Discover and load all case files from a directory.
///
/// Returns cases sorted by id. Errors if duplicate ids are found.
pub fn discover_cases(dir: &Path) -> Result<Vec<CaseFile>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut cases = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read cases dir {}", dir.display()))? {
        let entry = entry.context("read case entry")?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        cases.push(CaseFile::load(&path)?);
    }
    cases.sort_by(|left, right| left.case.id.cmp(&right.case.id));
    for pair in cases.windows(2) {
        if pair[0].case.id == pair[1].case.id {
            return Err(anyhow!("duplicate case.id {}", pair[0].case.id));
        }
    }
    Ok(cases)
}

fn validate_case_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        bail!("case.id must be non-empty");
    }
    if !id
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
    {
        bail!("case.id must use [a-z0-9_-] only");
    }
    Ok(())
}
