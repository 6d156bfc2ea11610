//! CLI configuration stored in `kata.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::fuzzy::FoldMode;
use crate::core::ranges::ArrowPolicy;

/// Kata configuration (TOML).
///
/// Every field is optional in the file; missing fields fall back to the
/// defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KataConfig {
    /// Wall-clock budget for a single command, in milliseconds.
    pub timeout_ms: u64,

    pub ranges: RangesConfig,

    pub fuzzy: FuzzyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RangesConfig {
    /// Handling of `start->target` tokens.
    pub arrows: ArrowPolicy,

    /// Refuse to print more than this many values.
    pub max_values: usize,
}

impl Default for RangesConfig {
    fn default() -> Self {
        Self {
            arrows: ArrowPolicy::default(),
            max_values: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FuzzyConfig {
    pub mode: FoldMode,
}

impl Default for KataConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 500,
            ranges: RangesConfig::default(),
            fuzzy: FuzzyConfig::default(),
        }
    }
}

impl KataConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(anyhow!("timeout_ms must be > 0"));
        }
        if self.ranges.max_values == 0 {
            return Err(anyhow!("ranges.max_values must be > 0"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `KataConfig::default()`.
pub fn load_config(path: &Path) -> Result<KataConfig> {
    if !path.exists() {
        let cfg = KataConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: KataConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Write config to disk, creating parent directories as needed.
pub fn write_config(path: &Path, cfg: &KataConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(path, buf).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, KataConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("kata.toml");
        let cfg = KataConfig {
            timeout_ms: 1_500,
            ranges: RangesConfig {
                arrows: ArrowPolicy::KeepStart,
                max_values: 10,
            },
            fuzzy: FuzzyConfig {
                mode: FoldMode::CaseOnly,
            },
        };
        write_config(&path, &cfg).expect("write");
        assert_eq!(load_config(&path).expect("load"), cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("kata.toml");
        fs::write(&path, "[ranges]\narrows = \"keep_start\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.ranges.arrows, ArrowPolicy::KeepStart);
        assert_eq!(cfg.ranges.max_values, 1_000_000);
        assert_eq!(cfg.timeout_ms, 500);
        assert_eq!(cfg.fuzzy.mode, FoldMode::Normalized);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("kata.toml");
        fs::write(&path, "timeout_ms = 0\n").expect("write");
        let err = load_config(&path).expect_err("zero timeout");
        assert!(format!("{err:#}").contains("timeout_ms"));
    }
}
