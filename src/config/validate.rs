// src/config/validate.rs

use std::collections::HashSet;

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{FetchrunError, Result};
use crate::job::CommandSpec;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = FetchrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.default, raw.job))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_jobs(cfg)?;
    validate_job_names(cfg)?;
    validate_commands(cfg)?;
    validate_timeouts(cfg)?;
    Ok(())
}

fn ensure_has_jobs(cfg: &RawConfigFile) -> Result<()> {
    if cfg.job.is_empty() {
        return Err(FetchrunError::ConfigError(
            "config must contain at least one [[job]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_job_names(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, job) in cfg.job.iter().enumerate() {
        let name = job.name.trim();
        if name.is_empty() {
            return Err(FetchrunError::ConfigError(format!(
                "job #{} has an empty name",
                index + 1
            )));
        }
        if name != job.name {
            return Err(FetchrunError::ConfigError(format!(
                "job name '{}' must not have leading or trailing whitespace",
                job.name
            )));
        }
        // Names double as log file names under `log_dir`.
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(FetchrunError::ConfigError(format!(
                "job name '{}' must not contain path separators",
                job.name
            )));
        }
        if !seen.insert(name) {
            return Err(FetchrunError::ConfigError(format!(
                "duplicate job name '{}'",
                job.name
            )));
        }
    }
    Ok(())
}

fn validate_commands(cfg: &RawConfigFile) -> Result<()> {
    for job in cfg.job.iter() {
        let empty = match &job.cmd {
            CommandSpec::Argv(argv) => argv.first().is_none_or(|p| p.trim().is_empty()),
            CommandSpec::Shell(line) => line.trim().is_empty(),
        };
        if empty {
            return Err(FetchrunError::ConfigError(format!(
                "job '{}' has an empty `cmd`",
                job.name
            )));
        }
    }
    Ok(())
}

fn validate_timeouts(cfg: &RawConfigFile) -> Result<()> {
    if let Some(ref s) = cfg.config.default_timeout {
        parse_duration(s).map_err(|e| {
            FetchrunError::ConfigError(format!("invalid [config].default_timeout: {e}"))
        })?;
    }

    for job in cfg.job.iter() {
        if let Some(ref s) = job.timeout {
            parse_duration(s).map_err(|e| {
                FetchrunError::ConfigError(format!(
                    "job '{}' has an invalid `timeout`: {e}",
                    job.name
                ))
            })?;
        }
    }
    Ok(())
}
