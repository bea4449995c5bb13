// src/exec/process.rs

//! Single job process runner.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::job::{CommandSpec, JobDescriptor, JobOutcome, JobResult};

/// How long to keep draining pipes after a timed-out job was killed. A
/// grandchild that inherited the pipe can keep it open past the kill.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Everything observed about a process, minus the timestamps.
struct Finished {
    outcome: JobOutcome,
    exit_code: Option<i32>,
    stdout: Option<Vec<u8>>,
    stderr: Option<Vec<u8>>,
}

impl Finished {
    fn not_found(reason: String) -> Self {
        Self {
            outcome: JobOutcome::NotFound(reason),
            exit_code: None,
            stdout: None,
            stderr: None,
        }
    }
}

/// Run a single job to completion and describe how it went.
///
/// - The working directory is handed to the spawn call, never set on the
///   runner process.
/// - With `capture_output`, stdout/stderr are piped and collected byte for
///   byte; otherwise they are inherited.
/// - With a timeout, the child is killed once it elapses.
pub async fn run_job(job: &JobDescriptor) -> JobResult {
    let started_at = Utc::now();

    info!(
        job = %job.name,
        cmd = %job.command,
        dir = ?job.working_dir,
        capture = job.capture_output,
        "starting job process"
    );

    let finished = run_job_inner(job).await;
    let finished_at = Utc::now();

    match finished.outcome {
        JobOutcome::Success => info!(job = %job.name, exit_code = 0, "job succeeded"),
        JobOutcome::Failed(code) => warn!(job = %job.name, exit_code = code, "job failed"),
        JobOutcome::NotFound(ref reason) => error!(job = %job.name, %reason, "job could not be started"),
        JobOutcome::TimedOut => warn!(job = %job.name, timeout = ?job.timeout, "job timed out"),
        JobOutcome::Skipped => {}
    }

    JobResult {
        job: job.name.clone(),
        outcome: finished.outcome,
        exit_code: finished.exit_code,
        stdout: finished.stdout,
        stderr: finished.stderr,
        started_at,
        finished_at,
    }
}

async fn run_job_inner(job: &JobDescriptor) -> Finished {
    if !job.working_dir.is_dir() {
        return Finished::not_found(format!(
            "working directory {:?} does not exist",
            job.working_dir
        ));
    }

    let Some(mut cmd) = build_command(&job.command) else {
        return Finished::not_found("empty command".to_string());
    };

    let stdio = || {
        if job.capture_output {
            Stdio::piped()
        } else {
            Stdio::inherit()
        }
    };

    cmd.current_dir(&job.working_dir)
        .stdout(stdio())
        .stderr(stdio())
        .kill_on_drop(true);

    // A job that can time out leads its own process group, so expiry can
    // take down everything it spawned. Jobs without a timeout stay in the
    // runner's group and keep receiving terminal signals like Ctrl-C.
    #[cfg(unix)]
    if job.timeout.is_some() {
        cmd.process_group(0);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return Finished::not_found(spawn_failure_reason(&job.command, &e)),
    };

    // Drain both pipes concurrently so neither can fill up and stall the job.
    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let pid = child.id();

    let waited = match job.timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait()).await.ok(),
        None => Some(child.wait().await),
    };

    let (outcome, exit_code, timed_out) = match waited {
        Some(waited) => {
            let (outcome, exit_code) = outcome_of(waited);
            debug!(job = %job.name, ?exit_code, outcome = outcome.label(), "job process exited");
            (outcome, exit_code, false)
        }
        None => {
            #[cfg(unix)]
            if let Some(pgid) = pid {
                if let Err(e) = kill_process_group(pgid) {
                    warn!(job = %job.name, pgid, error = %e, "failed to kill job process group");
                }
            }
            #[cfg(not(unix))]
            let _ = pid;

            // Also reaps the child.
            if let Err(e) = child.kill().await {
                warn!(job = %job.name, error = %e, "failed to kill timed-out job process");
            }
            (JobOutcome::TimedOut, None, true)
        }
    };

    let stdout = collect(stdout_reader, timed_out).await;
    let stderr = collect(stderr_reader, timed_out).await;

    Finished {
        outcome,
        exit_code,
        stdout,
        stderr,
    }
}

/// Build the platform command for a job. `None` for an empty argv.
fn build_command(spec: &CommandSpec) -> Option<Command> {
    match spec {
        CommandSpec::Argv(argv) => {
            let (program, args) = argv.split_first()?;
            let mut c = Command::new(program);
            c.args(args);
            Some(c)
        }
        CommandSpec::Shell(line) => {
            let mut c = if cfg!(windows) {
                let mut c = Command::new("cmd");
                c.arg("/C");
                c
            } else {
                let mut c = Command::new("sh");
                c.arg("-c");
                c
            };
            c.arg(line);
            Some(c)
        }
    }
}

fn spawn_failure_reason(spec: &CommandSpec, err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => format!("program '{}' not found", spec.program()),
        io::ErrorKind::PermissionDenied => {
            format!("program '{}' is not executable", spec.program())
        }
        _ => format!("failed to start '{}': {}", spec.program(), err),
    }
}

/// Outcome and exit code for a process the runner waited on. The exit code
/// is always present, so a failed wait is recorded as `Failed(-1)` with
/// `exit_code = Some(-1)`.
fn outcome_of(waited: io::Result<ExitStatus>) -> (JobOutcome, Option<i32>) {
    match waited {
        Ok(status) if status.success() => (JobOutcome::Success, Some(exit_code_of(&status))),
        Ok(status) => {
            let code = exit_code_of(&status);
            (JobOutcome::Failed(code), Some(code))
        }
        Err(e) => {
            error!(error = %e, "waiting for job process failed");
            (JobOutcome::Failed(-1), Some(-1))
        }
    }
}

/// SIGKILL every process in the group led by `pgid`, grandchildren included.
#[cfg(unix)]
fn kill_process_group(pgid: u32) -> io::Result<()> {
    let rc = unsafe { libc::killpg(pgid as libc::pid_t, libc::SIGKILL) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Exit code of a finished process. A process killed by a signal reports
/// `128 + signal`, the way shells do.
fn exit_code_of(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

fn spawn_reader<R>(mut pipe: R) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf).await {
            debug!(error = %e, bytes = buf.len(), "pipe read ended with error");
        }
        buf
    })
}

async fn collect(reader: Option<JoinHandle<Vec<u8>>>, bounded: bool) -> Option<Vec<u8>> {
    let handle = reader?;

    let joined = if bounded {
        let abort = handle.abort_handle();
        match tokio::time::timeout(DRAIN_GRACE, handle).await {
            Ok(joined) => joined,
            Err(_) => {
                abort.abort();
                debug!("pipe still open after kill; dropping remaining output");
                return Some(Vec::new());
            }
        }
    } else {
        handle.await
    };

    match joined {
        Ok(buf) => Some(buf),
        Err(e) => {
            warn!(error = %e, "output reader task failed");
            Some(Vec::new())
        }
    }
}
