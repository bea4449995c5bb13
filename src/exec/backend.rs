// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runner talks to a `JobExecutor` instead of spawning processes itself.
//! This makes it easy to swap in a fake executor in tests while keeping the
//! production implementation in [`super::process`].

use std::future::Future;
use std::pin::Pin;

use tracing::warn;

use crate::job::{JobDescriptor, JobResult};

use super::process::run_job;
use super::sink::LogSink;

/// Trait abstracting how one job is executed.
///
/// Implementations never fail: every way a job can go wrong is folded into
/// the returned [`JobResult`].
pub trait JobExecutor: Send {
    fn execute<'a>(
        &'a mut self,
        job: &'a JobDescriptor,
    ) -> Pin<Box<dyn Future<Output = JobResult> + Send + 'a>>;
}

/// Real executor used in production: spawns an OS process per job and, when
/// a [`LogSink`] is configured, persists captured output.
#[derive(Debug, Default)]
pub struct ProcessExecutor {
    sink: Option<LogSink>,
}

impl ProcessExecutor {
    pub fn new(sink: Option<LogSink>) -> Self {
        Self { sink }
    }
}

impl JobExecutor for ProcessExecutor {
    fn execute<'a>(
        &'a mut self,
        job: &'a JobDescriptor,
    ) -> Pin<Box<dyn Future<Output = JobResult> + Send + 'a>> {
        Box::pin(async move {
            let result = run_job(job).await;

            if let Some(ref sink) = self.sink {
                // A log that can't be written doesn't change the job's outcome.
                if let Err(e) = sink.write_captured(&result) {
                    warn!(job = %job.name, error = %e, "failed to write captured output");
                }
            }

            result
        })
    }
}
