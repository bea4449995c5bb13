// src/job/result.rs

use chrono::{DateTime, Utc};

use super::JobName;

/// How a single job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Exited with status 0.
    Success,
    /// Started and exited with this non-zero code.
    Failed(i32),
    /// The program or working directory could not be located, or the process
    /// could not be started at all.
    NotFound(String),
    /// Killed after exceeding its timeout.
    TimedOut,
    /// Never started because an earlier job failed under the `stop` policy.
    Skipped,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success)
    }

    /// Short machine-friendly label, used in the summary and JSON report.
    pub fn label(&self) -> &'static str {
        match self {
            JobOutcome::Success => "success",
            JobOutcome::Failed(_) => "failed",
            JobOutcome::NotFound(_) => "not_found",
            JobOutcome::TimedOut => "timed_out",
            JobOutcome::Skipped => "skipped",
        }
    }
}

/// Outcome record for one job of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub job: JobName,
    pub outcome: JobOutcome,
    /// Present whenever the process exited on its own.
    pub exit_code: Option<i32>,
    /// Exact bytes written to stdout; `None` unless output was captured.
    pub stdout: Option<Vec<u8>>,
    pub stderr: Option<Vec<u8>>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl JobResult {
    /// Record for a job that was never started.
    pub fn skipped(job: impl Into<JobName>, at: DateTime<Utc>) -> Self {
        Self {
            job: job.into(),
            outcome: JobOutcome::Skipped,
            exit_code: None,
            stdout: None,
            stderr: None,
            started_at: at,
            finished_at: at,
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
