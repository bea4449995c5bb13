// src/report.rs

//! Run report: the ordered job results of one run, plus the ways they are
//! presented (human summary, JSON document, process exit code).

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::job::{JobOutcome, JobResult};

/// Exit code when every job succeeded.
pub const EXIT_ALL_SUCCEEDED: i32 = 0;
/// Exit code when at least one job did not succeed.
pub const EXIT_JOB_FAILURES: i32 = 1;
/// Exit code for fatal runner errors (bad config, unwritable report).
pub const EXIT_RUNNER_ERROR: i32 = 2;

/// Ordered results of a run, one per job, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    results: Vec<JobResult>,
}

impl RunReport {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, result: JobResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[JobResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, job: &str) -> Option<&JobResult> {
        self.results.iter().find(|r| r.job == job)
    }

    pub fn succeeded_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    /// Jobs that did not succeed, skipped ones included.
    pub fn failed_count(&self) -> usize {
        self.len() - self.succeeded_count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_succeeded() {
            EXIT_ALL_SUCCEEDED
        } else {
            EXIT_JOB_FAILURES
        }
    }

    /// One line per job plus a totals line, e.g.
    ///
    /// ```text
    /// crypto      success     exit=0    12.04s
    /// usstocks    failed      exit=1     3.51s
    /// 1 succeeded, 1 failed
    /// ```
    pub fn render_summary(&self) -> String {
        let width = self.results.iter().map(|r| r.job.len()).max().unwrap_or(0);
        let mut out = String::new();

        for r in &self.results {
            let exit = r
                .exit_code
                .map(|c| format!("exit={c}"))
                .unwrap_or_else(|| "exit=-".to_string());
            let secs = r.duration().num_milliseconds() as f64 / 1000.0;

            let _ = write!(
                out,
                "{:<width$}  {:<10}  {:<8}  {:>8.2}s",
                r.job,
                r.outcome.label(),
                exit,
                secs,
                width = width
            );
            if let JobOutcome::NotFound(ref reason) = r.outcome {
                let _ = write!(out, "  ({reason})");
            }
            out.push('\n');
        }

        let _ = writeln!(
            out,
            "{} succeeded, {} failed",
            self.succeeded_count(),
            self.failed_count()
        );
        out
    }

    pub fn to_json(&self) -> Result<String> {
        let doc = ReportDocument::from(self);
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn write_json(&self, fs: &dyn FileSystem, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs.write(path, json.as_bytes())?;
        Ok(())
    }
}

/// Serialized shape of a report.
#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    succeeded: usize,
    failed: usize,
    exit_code: i32,
    jobs: Vec<JobEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct JobEntry<'a> {
    name: &'a str,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    exit_code: Option<i32>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    duration_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stderr: Option<String>,
}

impl<'a> From<&'a RunReport> for ReportDocument<'a> {
    fn from(report: &'a RunReport) -> Self {
        let jobs = report
            .results
            .iter()
            .map(|r| JobEntry {
                name: &r.job,
                outcome: r.outcome.label(),
                reason: match r.outcome {
                    JobOutcome::NotFound(ref reason) => Some(reason.as_str()),
                    _ => None,
                },
                exit_code: r.exit_code,
                started_at: r.started_at,
                finished_at: r.finished_at,
                duration_ms: r.duration().num_milliseconds(),
                stdout: r.stdout.as_deref().map(|b| String::from_utf8_lossy(b).into_owned()),
                stderr: r.stderr.as_deref().map(|b| String::from_utf8_lossy(b).into_owned()),
            })
            .collect();

        Self {
            succeeded: report.succeeded_count(),
            failed: report.failed_count(),
            exit_code: report.exit_code(),
            jobs,
        }
    }
}
