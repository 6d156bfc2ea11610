mod case;
mod cli;
mod judge;
mod outcome;
mod report;
mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kata::io::config::load_config;
use kata::logging;

/// Every non-bonus case passed.
const EXIT_OK: i32 = 0;
/// At least one non-bonus case failed, timed out or errored.
const EXIT_FAILED: i32 = 1;
/// The harness itself could not run (bad case file, missing case, bad config).
const EXIT_HARNESS: i32 = 2;

#[derive(Parser)]
#[command(name = "drill", version, about = "Case harness for the kata utilities")]
struct Cli {
    /// Directory holding `*.toml` case files.
    #[arg(long, global = true, default_value = "drill/cases")]
    cases: PathBuf,

    /// kata config supplying the default timeout and range limit.
    #[arg(long, global = true, default_value = "kata.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    List,
    Run {
        /// Run only this case.
        case_id: Option<String>,
        /// Also write the full report as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(true) => EXIT_OK,
        Ok(false) => EXIT_FAILED,
        Err(err) => {
            eprintln!("{:#}", err);
            EXIT_HARNESS
        }
    };
    std::process::exit(code);
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    match cli.command {
        Command::List => cli::list_cases(&cli.cases).map(|()| true),
        Command::Run { case_id, json } => {
            let cfg = load_config(&cli.config).context("load config")?;
            cli::run_cases(&cli.cases, case_id.as_deref(), &cfg, json.as_deref())
        }
    }
}
