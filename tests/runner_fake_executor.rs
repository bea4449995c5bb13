// tests/runner_fake_executor.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::sync::{Arc, Mutex};

use fetchrun::engine::JobRunner;
use fetchrun::job::{CommandSpec, JobDescriptor, JobOutcome};
use fetchrun::report::{EXIT_ALL_SUCCEEDED, EXIT_JOB_FAILURES};
use fetchrun::types::FailurePolicy;
use fetchrun_test_utils::fake_executor::ScriptedExecutor;

type TestResult = Result<(), Box<dyn Error>>;

fn fetch_jobs() -> Vec<JobDescriptor> {
    ["crypto", "usstocks", "indstocks"]
        .into_iter()
        .map(|name| {
            JobDescriptor::new(
                name,
                CommandSpec::Argv(vec!["python3".to_string(), format!("fetch_{name}.py")]),
                "execution_scripts",
            )
        })
        .collect()
}

fn recorder() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

#[tokio::test]
async fn failing_middle_job_does_not_stop_the_run() -> TestResult {
    with_timeout(async {
        init_tracing();

        let executed = recorder();
        let executor = ScriptedExecutor::new(executed.clone())
            .with_outcome("usstocks", JobOutcome::Failed(1));

        let runner = JobRunner::new(fetch_jobs(), FailurePolicy::Continue, executor)?;
        let report = runner.run().await;

        assert_eq!(
            *executed.lock().unwrap(),
            vec!["crypto", "usstocks", "indstocks"]
        );

        let outcomes: Vec<_> = report.results().iter().map(|r| r.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![JobOutcome::Success, JobOutcome::Failed(1), JobOutcome::Success]
        );
        assert_eq!(report.get("usstocks").and_then(|r| r.exit_code), Some(1));
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.exit_code(), EXIT_JOB_FAILURES);

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn all_successful_jobs_exit_zero_in_order() -> TestResult {
    with_timeout(async {
        init_tracing();

        let executed = recorder();
        let runner = JobRunner::new(
            fetch_jobs(),
            FailurePolicy::Continue,
            ScriptedExecutor::new(executed.clone()),
        )?;
        let report = runner.run().await;

        assert_eq!(report.len(), 3);
        assert!(report.all_succeeded());
        assert_eq!(report.exit_code(), EXIT_ALL_SUCCEEDED);

        let starts: Vec<_> = report.results().iter().map(|r| r.started_at).collect();
        assert!(starts.windows(2).all(|w| w[0] <= w[1]));

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn not_found_job_is_reported_and_the_run_continues() -> TestResult {
    with_timeout(async {
        init_tracing();

        let executed = recorder();
        let executor = ScriptedExecutor::new(executed.clone()).with_outcome(
            "crypto",
            JobOutcome::NotFound("program 'python3' not found".to_string()),
        );

        let report = JobRunner::new(fetch_jobs(), FailurePolicy::Continue, executor)?
            .run()
            .await;

        assert_eq!(executed.lock().unwrap().len(), 3);
        assert!(matches!(
            report.results()[0].outcome,
            JobOutcome::NotFound(_)
        ));
        assert_eq!(report.results()[0].exit_code, None);
        assert!(report.results()[1].outcome.is_success());

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn stop_policy_skips_remaining_jobs_but_keeps_them_in_the_report() -> TestResult {
    with_timeout(async {
        init_tracing();

        let executed = recorder();
        let executor = ScriptedExecutor::new(executed.clone())
            .with_outcome("crypto", JobOutcome::Failed(137));

        let runner = JobRunner::new(fetch_jobs(), FailurePolicy::Stop, executor)?;
        assert_eq!(runner.policy(), FailurePolicy::Stop);
        let report = runner.run().await;

        assert_eq!(*executed.lock().unwrap(), vec!["crypto"]);
        assert_eq!(report.len(), 3);
        assert_eq!(report.results()[0].exit_code, Some(137));
        assert_eq!(report.results()[1].outcome, JobOutcome::Skipped);
        assert_eq!(report.results()[2].outcome, JobOutcome::Skipped);
        assert_eq!(report.results()[2].job, "indstocks");
        assert_eq!(report.failed_count(), 3);

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn stop_policy_with_timeout_on_last_job_skips_nothing() -> TestResult {
    with_timeout(async {
        init_tracing();

        let executed = recorder();
        let executor = ScriptedExecutor::new(executed.clone())
            .with_outcome("indstocks", JobOutcome::TimedOut);

        let report = JobRunner::new(fetch_jobs(), FailurePolicy::Stop, executor)?
            .run()
            .await;

        assert_eq!(executed.lock().unwrap().len(), 3);
        assert_eq!(report.results()[2].outcome, JobOutcome::TimedOut);
        assert_eq!(report.succeeded_count(), 2);

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}
