// src/config/mod.rs

//! Configuration loading and validation for fetchrun.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a job list from disk (`loader.rs`).
//! - Validate it before any job runs (`validate.rs`).
//! - Parse duration strings such as `"30s"` or `"10m"` (`duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{config_root_dir, load_and_validate, load_from_path, parse_config};
pub use model::{ConfigFile, ConfigSection, DefaultSection, JobConfig, RawConfigFile};
