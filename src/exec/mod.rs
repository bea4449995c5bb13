// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running a job's command with
//! `tokio::process::Command` and turning whatever happens into a
//! [`JobResult`](crate::job::JobResult).
//!
//! - [`backend`] provides the `JobExecutor` trait and the production
//!   `ProcessExecutor`. Tests swap in a scripted executor instead.
//! - [`process`] spawns one job, drains its pipes and waits for it.
//! - [`sink`] writes captured output to `<log_dir>/<job>.{stdout,stderr}.log`.

pub mod backend;
pub mod process;
pub mod sink;

pub use backend::{JobExecutor, ProcessExecutor};
pub use process::run_job;
pub use sink::LogSink;
