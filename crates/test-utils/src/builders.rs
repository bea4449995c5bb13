#![allow(dead_code)]

use std::path::PathBuf;

use fetchrun::config::{ConfigFile, ConfigSection, DefaultSection, JobConfig, RawConfigFile};
use fetchrun::job::CommandSpec;
use fetchrun::types::FailurePolicy;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                default: DefaultSection::default(),
                job: Vec::new(),
            },
        }
    }

    pub fn with_job(mut self, job: JobConfig) -> Self {
        self.config.job.push(job);
        self
    }

    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.config.config.on_failure = policy;
        self
    }

    pub fn default_timeout(mut self, duration: &str) -> Self {
        self.config.config.default_timeout = Some(duration.to_string());
        self
    }

    pub fn log_dir(mut self, dir: &str) -> Self {
        self.config.config.log_dir = Some(PathBuf::from(dir));
        self
    }

    pub fn default_working_dir(mut self, dir: &str) -> Self {
        self.config.default.working_dir = Some(PathBuf::from(dir));
        self
    }

    pub fn default_capture_output(mut self, val: bool) -> Self {
        self.config.default.capture_output = val;
        self
    }

    /// The unvalidated config, for tests that expect validation to fail.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `JobConfig`.
pub struct JobConfigBuilder {
    job: JobConfig,
}

impl JobConfigBuilder {
    /// Job with an argv command.
    pub fn new(name: &str, argv: &[&str]) -> Self {
        Self::with_cmd(name, CommandSpec::argv(argv.iter().copied()))
    }

    /// Job with a shell command line.
    pub fn shell(name: &str, line: &str) -> Self {
        Self::with_cmd(name, CommandSpec::shell(line))
    }

    fn with_cmd(name: &str, cmd: CommandSpec) -> Self {
        Self {
            job: JobConfig {
                name: name.to_string(),
                cmd,
                working_dir: None,
                capture_output: None,
                timeout: None,
            },
        }
    }

    pub fn working_dir(mut self, dir: &str) -> Self {
        self.job.working_dir = Some(PathBuf::from(dir));
        self
    }

    pub fn capture_output(mut self, val: bool) -> Self {
        self.job.capture_output = Some(val);
        self
    }

    pub fn timeout(mut self, duration: &str) -> Self {
        self.job.timeout = Some(duration.to_string());
        self
    }

    pub fn build(self) -> JobConfig {
        self.job
    }
}
