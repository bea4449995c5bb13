// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod job;
pub mod logging;
pub mod report;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, config_root_dir, load_and_validate};
use crate::engine::JobRunner;
use crate::errors::Result;
use crate::exec::{LogSink, ProcessExecutor};
use crate::fs::{FileSystem, RealFileSystem};
use crate::job::JobDescriptor;
use crate::types::FailurePolicy;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - job descriptor resolution
/// - the process executor (with an optional log sink)
/// - the sequential runner, summary and optional JSON report
///
/// Returns the process exit code: `0` when every job succeeded, `1`
/// otherwise. Fatal runner errors come back as `Err`.
pub async fn run(args: CliArgs) -> Result<i32> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let root_dir = config_root_dir(&config_path);
    let jobs = cfg.job_descriptors(&root_dir)?;

    if args.dry_run {
        print_dry_run(&cfg, &jobs, &root_dir);
        return Ok(report::EXIT_ALL_SUCCEEDED);
    }

    let policy = if args.stop_on_failure {
        FailurePolicy::Stop
    } else {
        cfg.config.on_failure
    };

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let sink = cfg
        .log_dir(&root_dir)
        .map(|dir| LogSink::new(dir, Arc::clone(&fs)));
    if let Some(ref sink) = sink {
        info!(dir = ?sink.dir(), "captured output will be written to log files");
    }

    let runner = JobRunner::new(jobs, policy, ProcessExecutor::new(sink))?;
    let report = runner.run().await;

    print!("{}", report.render_summary());

    if let Some(ref path) = args.report {
        report.write_json(fs.as_ref(), Path::new(path))?;
        info!(path = %path, "wrote JSON run report");
    }

    Ok(report.exit_code())
}

/// Simple dry-run output: print the resolved jobs in run order.
fn print_dry_run(cfg: &ConfigFile, jobs: &[JobDescriptor], root_dir: &Path) {
    println!("fetchrun dry-run");
    println!("  config.on_failure = {}", cfg.config.on_failure);
    if let Some(ref t) = cfg.config.default_timeout {
        println!("  config.default_timeout = {t}");
    }
    if let Some(dir) = cfg.log_dir(root_dir) {
        println!("  config.log_dir = {}", dir.display());
    }
    println!();

    println!("jobs ({}):", jobs.len());
    for (index, job) in jobs.iter().enumerate() {
        println!("  {}. {}", index + 1, job.name);
        println!("      cmd: {}", job.command);
        println!("      working_dir: {}", job.working_dir.display());
        if job.capture_output {
            println!("      capture_output: true");
        }
        if let Some(timeout) = job.timeout {
            println!("      timeout: {timeout:?}");
        }
    }

    debug!("dry-run complete (no execution)");
}
