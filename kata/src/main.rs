//! Command-line front end for the kata utilities.
//!
//! Every command runs under the wall-clock budget from `kata.toml` so that a
//! pathological input ends in a timeout instead of a hang.

use std::cmp::Ordering;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use kata::core::account::Account;
use kata::core::flatten::{Nested, deep_flatten};
use kata::core::fuzzy::{FoldMode, FuzzyString};
use kata::core::ranges::{ArrowPolicy, RangeParser};
use kata::exit_codes;
use kata::io::config::{KataConfig, load_config};
use kata::io::timeout::{TimeoutError, with_timeout};
use kata::logging;

#[derive(Parser)]
#[command(name = "kata", version, about = "Small utility exercises behind one CLI")]
struct Cli {
    /// Path to the TOML config file (optional).
    #[arg(long, global = true, default_value = "kata.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Expand range notation such as `1-3,5` into one integer per line.
    Ranges {
        input: String,
        /// Override the configured handling of `start->target` tokens.
        #[arg(long, value_enum)]
        arrows: Option<ArrowArg>,
    },
    /// Flatten a nested JSON array; strings stay whole.
    Flatten { json: String },
    /// Compare two strings ignoring case (and accents unless `--case-only`).
    Fuzzy {
        left: String,
        right: String,
        #[arg(long)]
        case_only: bool,
    },
    /// Transfer between two fresh accounts and print both balances.
    Transfer {
        #[arg(long, allow_negative_numbers = true)]
        from: i64,
        #[arg(long, allow_negative_numbers = true)]
        to: i64,
        #[arg(long, allow_negative_numbers = true)]
        amount: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ArrowArg {
    Reject,
    KeepStart,
}

impl From<ArrowArg> for ArrowPolicy {
    fn from(arg: ArrowArg) -> Self {
        match arg {
            ArrowArg::Reject => ArrowPolicy::Reject,
            ArrowArg::KeepStart => ArrowPolicy::KeepStart,
        }
    }
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            if err.downcast_ref::<TimeoutError>().is_some() {
                exit_codes::TIMEOUT
            } else {
                exit_codes::INVALID
            }
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli.config).context("load config")?;
    debug!(config = %cli.config.display(), timeout_ms = cfg.timeout_ms, "config loaded");

    let lines = match cli.command {
        Command::Ranges { input, arrows } => cmd_ranges(&cfg, input, arrows)?,
        Command::Flatten { json } => cmd_flatten(&cfg, &json)?,
        Command::Fuzzy {
            left,
            right,
            case_only,
        } => cmd_fuzzy(&cfg, left, right, case_only)?,
        Command::Transfer { from, to, amount } => cmd_transfer(from, to, amount)?,
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn cmd_ranges(cfg: &KataConfig, input: String, arrows: Option<ArrowArg>) -> Result<Vec<String>> {
    let policy = arrows.map(ArrowPolicy::from).unwrap_or(cfg.ranges.arrows);
    let max_values = cfg.ranges.max_values;
    info!(?policy, max_values, "expanding ranges");
    let parser = RangeParser::new().arrows(policy);
    let values = with_timeout(cfg.timeout(), move || {
        parser
            .parse(&input)
            .take(max_values.saturating_add(1))
            .collect::<Result<Vec<i64>, _>>()
    })
    .context("expand ranges")?
    .context("parse ranges")?;
    if values.len() > max_values {
        bail!("ranges expand to more than {max_values} values");
    }
    Ok(values.iter().map(i64::to_string).collect())
}

fn cmd_flatten(cfg: &KataConfig, json: &str) -> Result<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(json).context("parse json input")?;
    let flat = with_timeout(cfg.timeout(), move || {
        deep_flatten(Nested::from(value)).collect::<Vec<_>>()
    })
    .context("flatten")?;
    debug!(atoms = flat.len(), "flattened");
    Ok(vec![serde_json::to_string(&flat).context("serialize output")?])
}

fn cmd_fuzzy(cfg: &KataConfig, left: String, right: String, case_only: bool) -> Result<Vec<String>> {
    let mode = if case_only {
        FoldMode::CaseOnly
    } else {
        cfg.fuzzy.mode
    };
    let left = FuzzyString::with_mode(left, mode);
    let ordering = match left.compare(&right) {
        Ordering::Less => "less",
        Ordering::Equal => "equal",
        Ordering::Greater => "greater",
    };
    Ok(vec![
        ordering.to_string(),
        format!("contains={}", left.contains(&right)),
    ])
}

fn cmd_transfer(from: i64, to: i64, amount: i64) -> Result<Vec<String>> {
    let mut source = Account::new(from).context("open source account")?;
    let mut target = Account::new(to).context("open target account")?;
    if let Err(err) = source.transfer(&mut target, amount) {
        bail!("transfer {amount}: {err} (balances unchanged: {source}, {target})");
    }
    Ok(vec![source.to_string(), target.to_string()])
}
