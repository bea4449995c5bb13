// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Only runner-level problems live here. A job that fails, cannot be found or
//! times out is *not* an error of the runner; it is recorded as a
//! [`JobOutcome`](crate::job::JobOutcome) in the run report instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchrunError {
    /// The job list is empty or malformed. Fatal before any job runs.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Report serialization error: {0}")]
    ReportError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FetchrunError>;
