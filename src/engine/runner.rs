// src/engine/runner.rs

use std::fmt;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::{FetchrunError, Result};
use crate::exec::JobExecutor;
use crate::job::{JobDescriptor, JobResult};
use crate::report::RunReport;
use crate::types::FailurePolicy;

/// Runs a fixed, ordered list of jobs one after another.
///
/// - Every job gets exactly one entry in the report, in list order.
/// - Under [`FailurePolicy::Continue`] a failing job never stops the run.
/// - Under [`FailurePolicy::Stop`] jobs after the first non-success are not
///   started and are recorded as skipped.
pub struct JobRunner<E: JobExecutor> {
    jobs: Vec<JobDescriptor>,
    policy: FailurePolicy,
    executor: E,
}

impl<E: JobExecutor> fmt::Debug for JobRunner<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobRunner")
            .field("jobs", &self.jobs)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<E: JobExecutor> JobRunner<E> {
    /// Fails with [`FetchrunError::ConfigError`] for an empty job list, before
    /// anything runs.
    pub fn new(jobs: Vec<JobDescriptor>, policy: FailurePolicy, executor: E) -> Result<Self> {
        if jobs.is_empty() {
            return Err(FetchrunError::ConfigError(
                "job list must contain at least one job".to_string(),
            ));
        }

        Ok(Self {
            jobs,
            policy,
            executor,
        })
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Execute every job in order and return the report.
    pub async fn run(mut self) -> RunReport {
        let total = self.jobs.len();
        info!(jobs = total, policy = %self.policy, "fetchrun started");

        let mut report = RunReport::with_capacity(total);
        let mut halted_by: Option<String> = None;

        for (index, job) in self.jobs.iter().enumerate() {
            if let Some(ref failed) = halted_by {
                debug!(job = %job.name, after = %failed, "skipping job");
                report.push(JobResult::skipped(&job.name, Utc::now()));
                continue;
            }

            info!(job = %job.name, position = index + 1, total, "running job");
            let result = self.executor.execute(job).await;

            if !result.outcome.is_success() && self.policy == FailurePolicy::Stop {
                warn!(
                    job = %job.name,
                    outcome = result.outcome.label(),
                    remaining = total - index - 1,
                    "on_failure = stop; remaining jobs will be skipped"
                );
                halted_by = Some(job.name.clone());
            }

            report.push(result);
        }

        info!(
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            "fetchrun finished"
        );

        report
    }
}
