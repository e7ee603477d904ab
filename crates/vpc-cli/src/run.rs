//! # Run Subcommand
//!
//! Deploys a fresh suite from the effective configuration, replays a
//! script against it, and prints one JSON outcome per step followed by the
//! digest of the final state.
//!
//! Exit codes: `0` when the script ran to completion (contract errors are
//! ordinary outcomes), `2` when `--fail-fast` stopped at an error outcome.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::config::SuiteConfig;
use crate::script::{execute, Outcome, Script};

/// Exit status when `--fail-fast` stops a run.
pub const EXIT_FAIL_FAST: u8 = 2;

/// Arguments for `vpc run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Script of contract calls (YAML or JSON).
    pub script: PathBuf,

    /// Write the final state snapshot as pretty JSON to this path.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Stop at the first error outcome and exit with status 2.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Final line of a run.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    steps: usize,
    errors: usize,
    digest: &'a str,
}

/// Result of replaying a script.
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<Outcome>,
    /// `true` if `--fail-fast` cut the run short.
    pub stopped_early: bool,
    /// `sha256:<hex>` of the final snapshot.
    pub digest: String,
}

/// Execute the run subcommand, writing outcomes to stdout.
pub fn run_script(args: &RunArgs, config: &SuiteConfig) -> Result<u8> {
    let script = Script::load(&args.script)?;
    let stdout = std::io::stdout();
    let report = replay(&script, config, args, &mut stdout.lock())?;
    Ok(if report.stopped_early { EXIT_FAIL_FAST } else { 0 })
}

/// Replay `script` against a fresh suite, streaming outcomes to `out`.
pub fn replay(
    script: &Script,
    config: &SuiteConfig,
    args: &RunArgs,
    out: &mut impl Write,
) -> Result<RunReport> {
    script.check()?;
    let mut suite = config.deploy()?;
    let mut outcomes = Vec::with_capacity(script.steps.len());
    let mut stopped_early = false;

    for (index, step) in script.steps.iter().enumerate() {
        let outcome = execute(&mut suite, step, config.seconds_per_block)
            .with_context(|| format!("step {index} ({}) failed", step.op()))?;
        writeln!(out, "{}", serde_json::to_string(&outcome)?)?;
        let failed = outcome.is_error();
        outcomes.push(outcome);
        if failed && args.fail_fast {
            tracing::warn!(index, op = step.op(), "stopping at first error outcome");
            stopped_early = true;
            break;
        }
    }

    let snapshot = suite.snapshot();
    let digest = snapshot.digest().context("failed to digest final state")?.to_string();
    if let Some(path) = &args.snapshot {
        write_snapshot(path, &snapshot.to_json_pretty()?)?;
    }

    let summary = Summary {
        steps: outcomes.len(),
        errors: outcomes.iter().filter(|o| o.is_error()).count(),
        digest: &digest,
    };
    writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    tracing::info!(steps = summary.steps, errors = summary.errors, %digest, "run complete");

    Ok(RunReport {
        outcomes,
        stopped_early,
        digest,
    })
}

fn write_snapshot(path: &Path, json: &str) -> Result<()> {
    std::fs::write(path, json)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote snapshot");
    Ok(())
}
