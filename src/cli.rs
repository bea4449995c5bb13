// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `fetchrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fetchrun",
    version,
    about = "Run a fixed list of fetch jobs one after another and report how each one went.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job list (TOML).
    ///
    /// Default: `Fetchrun.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Fetchrun.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FETCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the job list, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after the first job that does not succeed; remaining jobs are
    /// reported as skipped. Overrides `[config].on_failure`.
    #[arg(long)]
    pub stop_on_failure: bool,

    /// Also write the run report as JSON to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
