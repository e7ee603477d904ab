//! # vpc CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vpc_cli::config::SuiteConfig;
use vpc_cli::run::{run_script, RunArgs};
use vpc_cli::validate::{run_validate, ValidateArgs};

/// Verifiable professional credentials: replay and inspect contract calls
/// against an in-process credential suite.
#[derive(Parser, Debug)]
#[command(name = "vpc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a suite configuration file. Falls back to `VPC_CONFIG`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a script of contract calls and print each outcome.
    Run(RunArgs),

    /// Check a script without executing it.
    Validate(ValidateArgs),

    /// Print the effective suite configuration as YAML.
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match dispatch(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn dispatch(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Run(args) => {
            let config = SuiteConfig::resolve(cli.config.as_deref())?;
            run_script(&args, &config)
        }
        Commands::Validate(args) => run_validate(&args),
        Commands::Config => {
            let config = SuiteConfig::resolve(cli.config.as_deref())?;
            print!("{}", config.effective()?.to_yaml()?);
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_run_basic() {
        let cli = Cli::try_parse_from(["vpc", "run", "script.yaml"]).unwrap();
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.script, PathBuf::from("script.yaml"));
            assert!(args.snapshot.is_none());
            assert!(!args.fail_fast);
        } else {
            panic!("expected run");
        }
    }

    #[test]
    fn cli_parse_run_with_flags() {
        let cli = Cli::try_parse_from([
            "vpc",
            "run",
            "script.yaml",
            "--snapshot",
            "out.json",
            "--fail-fast",
        ])
        .unwrap();
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.snapshot, Some(PathBuf::from("out.json")));
            assert!(args.fail_fast);
        } else {
            panic!("expected run");
        }
    }

    #[test]
    fn cli_parse_validate() {
        let cli = Cli::try_parse_from(["vpc", "validate", "script.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vpc", "config", "-vv", "--config", "suite.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Config));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("suite.yaml")));
    }

    #[test]
    fn cli_parse_run_requires_script() {
        assert!(Cli::try_parse_from(["vpc", "run"]).is_err());
    }

    #[test]
    fn cli_parse_unknown_subcommand_fails() {
        assert!(Cli::try_parse_from(["vpc", "mint"]).is_err());
    }
}
