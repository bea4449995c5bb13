use std::fmt;

use serde::Deserialize;

/// What the runner does after a job does not succeed.
///
/// - `Continue`: record the outcome and start the next job (default).
/// - `Stop`: record the outcome, then mark every remaining job as skipped
///   without starting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Continue,
    Stop,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => f.write_str("continue"),
            FailurePolicy::Stop => f.write_str("stop"),
        }
    }
}
