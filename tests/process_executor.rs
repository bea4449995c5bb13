// tests/process_executor.rs
//
// Runs real processes through `sh`, so Unix only.
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use fetchrun::engine::JobRunner;
use fetchrun::exec::{JobExecutor, LogSink, ProcessExecutor, run_job};
use fetchrun::fs::mock::MockFileSystem;
use fetchrun::job::{CommandSpec, JobDescriptor, JobOutcome};
use fetchrun::types::FailurePolicy;

type TestResult = Result<(), Box<dyn Error>>;

fn sh_job(name: &str, line: &str, dir: &Path) -> JobDescriptor {
    JobDescriptor::new(name, CommandSpec::shell(line), dir)
}

#[tokio::test]
async fn exit_codes_are_recorded_and_every_job_runs() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;

        let jobs = vec![
            sh_job("crypto", "exit 0", dir.path()),
            sh_job("usstocks", "exit 137", dir.path()),
            sh_job("indstocks", "exit 0", dir.path()),
        ];

        let runner = JobRunner::new(jobs, FailurePolicy::Continue, ProcessExecutor::default())?;
        let report = runner.run().await;

        assert_eq!(report.len(), 3);
        assert_eq!(report.results()[0].outcome, JobOutcome::Success);
        assert_eq!(report.results()[0].exit_code, Some(0));
        assert_eq!(report.results()[1].outcome, JobOutcome::Failed(137));
        assert_eq!(report.results()[1].exit_code, Some(137));
        assert_eq!(report.results()[2].outcome, JobOutcome::Success);

        let results = report.results();
        for pair in results.windows(2) {
            assert!(pair[0].started_at <= pair[1].started_at);
            assert!(pair[0].finished_at <= pair[1].started_at);
        }

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn captured_stdout_holds_the_exact_bytes() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;

        let job = sh_job(
            "crypto",
            r"printf 'BTC\001\377\n'; printf 'warn' >&2",
            dir.path(),
        )
        .with_capture_output(true);

        let result = run_job(&job).await;

        assert_eq!(result.outcome, JobOutcome::Success);
        assert_eq!(result.stdout.as_deref(), Some(&b"BTC\x01\xff\n"[..]));
        assert_eq!(result.stderr.as_deref(), Some(&b"warn"[..]));

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn uncaptured_output_is_not_recorded() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;

        let result = run_job(&sh_job("crypto", "echo streamed", dir.path())).await;

        assert_eq!(result.outcome, JobOutcome::Success);
        assert_eq!(result.stdout, None);
        assert_eq!(result.stderr, None);

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn job_runs_in_its_own_working_directory() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;
        let scripts = dir.path().join("execution_scripts");
        std::fs::create_dir(&scripts)?;
        let cwd_before = std::env::current_dir()?;

        let job = JobDescriptor::new("crypto", CommandSpec::argv(["pwd", "-P"]), &scripts)
            .with_capture_output(true);
        let result = run_job(&job).await;

        let printed = String::from_utf8(result.stdout.unwrap_or_default())?;
        assert_eq!(Path::new(printed.trim()), scripts.canonicalize()?);
        assert_eq!(std::env::current_dir()?, cwd_before);

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn missing_program_is_not_found_and_the_next_job_still_runs() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;

        let jobs = vec![
            JobDescriptor::new(
                "crypto",
                CommandSpec::argv(["fetchrun-definitely-missing-program"]),
                dir.path(),
            ),
            sh_job("usstocks", "exit 0", dir.path()),
        ];

        let report = JobRunner::new(jobs, FailurePolicy::Continue, ProcessExecutor::default())?
            .run()
            .await;

        match &report.results()[0].outcome {
            JobOutcome::NotFound(reason) => {
                assert!(reason.contains("fetchrun-definitely-missing-program"));
            }
            other => panic!("Expected NotFound, got: {:?}", other),
        }
        assert_eq!(report.results()[0].exit_code, None);
        assert_eq!(report.results()[1].outcome, JobOutcome::Success);

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn missing_working_directory_is_not_found() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;

        let job = sh_job("crypto", "exit 0", &dir.path().join("gone"));
        let result = run_job(&job).await;

        assert!(matches!(result.outcome, JobOutcome::NotFound(ref r) if r.contains("working directory")));

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn missing_program_behind_a_shell_is_a_plain_failure() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;

        let job = sh_job("crypto", "fetchrun-definitely-missing-program", dir.path())
            .with_capture_output(true);
        let result = run_job(&job).await;

        assert_eq!(result.outcome, JobOutcome::Failed(127));

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn signal_death_is_reported_shell_style() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;

        let result = run_job(&sh_job("crypto", "kill -9 $$", dir.path())).await;

        assert_eq!(result.outcome, JobOutcome::Failed(137));
        assert_eq!(result.exit_code, Some(137));

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn timed_out_job_is_killed_and_the_next_job_runs() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;

        let jobs = vec![
            JobDescriptor::new("crypto", CommandSpec::argv(["sleep", "5"]), dir.path())
                .with_capture_output(true)
                .with_timeout(Duration::from_millis(200)),
            sh_job("usstocks", "exit 0", dir.path()),
        ];

        let started = Instant::now();
        let report = JobRunner::new(jobs, FailurePolicy::Continue, ProcessExecutor::default())?
            .run()
            .await;

        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(report.results()[0].outcome, JobOutcome::TimedOut);
        assert_eq!(report.results()[0].exit_code, None);
        assert_eq!(report.results()[1].outcome, JobOutcome::Success);

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn timeout_kills_everything_the_job_spawned() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;
        let marker = dir.path().join("late.marker");

        let jobs = vec![
            sh_job("crypto", r#"sh -c "sleep 1; touch late.marker"; true"#, dir.path())
                .with_capture_output(true)
                .with_timeout(Duration::from_millis(200)),
            sh_job("usstocks", "exit 0", dir.path()),
        ];

        let report = JobRunner::new(jobs, FailurePolicy::Continue, ProcessExecutor::default())?
            .run()
            .await;

        assert_eq!(report.results()[0].outcome, JobOutcome::TimedOut);
        assert_eq!(report.results()[1].outcome, JobOutcome::Success);

        // Well past the point where a surviving grandchild would have written it.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn captured_output_is_written_to_the_log_sink() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;
        let fs = MockFileSystem::new();
        let sink = LogSink::new("/var/log/fetchrun", Arc::new(fs.clone()));
        let mut executor = ProcessExecutor::new(Some(sink.clone()));

        let captured = sh_job("crypto", "echo prices; echo oops >&2; exit 3", dir.path())
            .with_capture_output(true);
        let streamed = sh_job("usstocks", "true", dir.path());

        let result = executor.execute(&captured).await;
        executor.execute(&streamed).await;

        assert_eq!(result.outcome, JobOutcome::Failed(3));
        assert_eq!(fs.contents(sink.stdout_path("crypto")), Some(b"prices\n".to_vec()));
        assert_eq!(fs.contents(sink.stderr_path("crypto")), Some(b"oops\n".to_vec()));
        assert_eq!(fs.paths().len(), 2);

        Ok::<_, Box<dyn Error>>(())
    })
    .await
}
