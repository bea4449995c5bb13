// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::duration::parse_duration;
use crate::errors::{FetchrunError, Result};
use crate::job::{CommandSpec, JobDescriptor};
use crate::types::FailurePolicy;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// on_failure = "continue"
/// log_dir = "logs"
///
/// [default]
/// working_dir = "execution_scripts"
///
/// [[job]]
/// name = "crypto"
/// cmd = ["python3", "fetch_finance_crypto.py"]
/// ```
///
/// Jobs are an array of tables: their order in the file is the order in
/// which they run.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub default: DefaultSection,

    #[serde(default)]
    pub job: Vec<JobConfig>,
}

/// Validated configuration.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)` (see
/// `validate.rs`), so holding one means the job list is non-empty, names are
/// unique and every duration string parses.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub default: DefaultSection,
    pub job: Vec<JobConfig>,
}

/// `[config]` section: run-wide behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// `"continue"` (default) or `"stop"`.
    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Timeout applied to jobs that don't set their own, e.g. `"30m"`.
    #[serde(default)]
    pub default_timeout: Option<String>,

    /// Directory receiving `<job>.stdout.log` / `<job>.stderr.log` for jobs
    /// with `capture_output = true`. Relative to the config file.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

/// `[default]` section: values inherited by every job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultSection {
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    #[serde(default)]
    pub capture_output: bool,
}

/// One `[[job]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub name: String,

    /// Either `["program", "arg", ...]` or a shell string.
    pub cmd: CommandSpec,

    /// Falls back to `default.working_dir`, then to the config directory.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    #[serde(default)]
    pub capture_output: Option<bool>,

    #[serde(default)]
    pub timeout: Option<String>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        default: DefaultSection,
        job: Vec<JobConfig>,
    ) -> Self {
        Self {
            config,
            default,
            job,
        }
    }

    /// Resolve every `[[job]]` into an immutable [`JobDescriptor`], in file
    /// order. Relative directories are joined onto `root_dir`.
    pub fn job_descriptors(&self, root_dir: &Path) -> Result<Vec<JobDescriptor>> {
        let default_timeout = self
            .config
            .default_timeout
            .as_deref()
            .map(parse_timeout)
            .transpose()?;

        self.job
            .iter()
            .map(|job| -> Result<JobDescriptor> {
                let dir = job
                    .working_dir
                    .as_ref()
                    .or(self.default.working_dir.as_ref());
                let working_dir = match dir {
                    Some(dir) => root_dir.join(dir),
                    None => root_dir.to_path_buf(),
                };

                let timeout = match job.timeout.as_deref() {
                    Some(s) => Some(parse_timeout(s)?),
                    None => default_timeout,
                };

                Ok(JobDescriptor {
                    name: job.name.clone(),
                    command: job.cmd.clone(),
                    working_dir,
                    capture_output: job.effective_capture_output(self.default.capture_output),
                    timeout,
                })
            })
            .collect()
    }

    /// Resolved `[config].log_dir`, if one is configured.
    pub fn log_dir(&self, root_dir: &Path) -> Option<PathBuf> {
        self.config.log_dir.as_ref().map(|dir| root_dir.join(dir))
    }
}

impl JobConfig {
    pub fn effective_capture_output(&self, default_capture: bool) -> bool {
        self.capture_output.unwrap_or(default_capture)
    }
}

fn parse_timeout(s: &str) -> Result<std::time::Duration> {
    parse_duration(s).map_err(FetchrunError::ConfigError)
}
