use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use fetchrun::exec::JobExecutor;
use fetchrun::job::{JobDescriptor, JobOutcome, JobResult};

/// A fake executor that:
/// - records which jobs were "run", in order
/// - answers each job with a scripted outcome (success when unscripted)
/// - never spawns a process.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    outcomes: HashMap<String, JobOutcome>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl ScriptedExecutor {
    pub fn new(executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            outcomes: HashMap::new(),
            executed,
        }
    }

    pub fn with_outcome(mut self, job: &str, outcome: JobOutcome) -> Self {
        self.outcomes.insert(job.to_string(), outcome);
        self
    }
}

impl JobExecutor for ScriptedExecutor {
    fn execute<'a>(
        &'a mut self,
        job: &'a JobDescriptor,
    ) -> Pin<Box<dyn Future<Output = JobResult> + Send + 'a>> {
        Box::pin(async move {
            self.executed.lock().unwrap().push(job.name.clone());

            let started_at = Utc::now();
            let outcome = self
                .outcomes
                .get(&job.name)
                .cloned()
                .unwrap_or(JobOutcome::Success);
            let exit_code = match outcome {
                JobOutcome::Success => Some(0),
                JobOutcome::Failed(code) => Some(code),
                _ => None,
            };
            let captured = job.capture_output.then(Vec::new);

            JobResult {
                job: job.name.clone(),
                outcome,
                exit_code,
                stdout: captured.clone(),
                stderr: captured,
                started_at,
                finished_at: Utc::now(),
            }
        })
    }
}
