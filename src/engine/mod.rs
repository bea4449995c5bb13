// src/engine/mod.rs

//! Sequential job engine.
//!
//! [`runner::JobRunner`] walks the job list in order, hands each job to a
//! [`JobExecutor`](crate::exec::JobExecutor), and collects the results into a
//! [`RunReport`](crate::report::RunReport). There is exactly one job in
//! flight at any time.

pub mod runner;

pub use crate::types::FailurePolicy;
pub use runner::JobRunner;
