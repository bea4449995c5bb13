// src/job/mod.rs

//! Job data model.
//!
//! - [`descriptor`] holds the static definition of a job: what to run and
//!   where.
//! - [`result`] holds what happened when it ran.

pub mod descriptor;
pub mod result;

pub use descriptor::{CommandSpec, JobDescriptor};
pub use result::{JobOutcome, JobResult};

/// Canonical job name type used throughout the crate.
pub type JobName = String;
