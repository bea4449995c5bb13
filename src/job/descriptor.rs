// src/job/descriptor.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use super::JobName;

/// How a job's process is started.
///
/// In TOML, `cmd = ["python3", "fetch.py"]` deserializes to `Argv` and
/// `cmd = "python3 fetch.py"` to `Shell`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    /// Program plus arguments, spawned directly. A missing program is
    /// reported as not found.
    Argv(Vec<String>),
    /// A command line handed to `sh -c` (`cmd /C` on Windows). The shell
    /// reports a missing program through its own exit code.
    Shell(String),
}

impl CommandSpec {
    pub fn argv<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::Argv(args.into_iter().map(Into::into).collect())
    }

    pub fn shell(line: impl Into<String>) -> Self {
        CommandSpec::Shell(line.into())
    }

    /// The executable that will actually be spawned.
    pub fn program(&self) -> &str {
        match self {
            CommandSpec::Argv(argv) => argv.first().map(String::as_str).unwrap_or(""),
            CommandSpec::Shell(_) if cfg!(windows) => "cmd",
            CommandSpec::Shell(_) => "sh",
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSpec::Argv(argv) => f.write_str(&argv.join(" ")),
            CommandSpec::Shell(line) => f.write_str(line),
        }
    }
}

/// Static definition of one job. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    pub name: JobName,
    pub command: CommandSpec,
    /// Passed to the spawn call; the runner's own cwd is never changed.
    pub working_dir: PathBuf,
    /// Pipe stdout/stderr into the result instead of inheriting them.
    pub capture_output: bool,
    pub timeout: Option<Duration>,
}

impl JobDescriptor {
    pub fn new(
        name: impl Into<JobName>,
        command: CommandSpec,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            command,
            working_dir: working_dir.into(),
            capture_output: false,
            timeout: None,
        }
    }

    pub fn with_capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
