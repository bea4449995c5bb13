// src/exec/sink.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::fs::FileSystem;
use crate::job::JobResult;

/// File-backed sink for captured job output.
///
/// For a job named `crypto` it writes `<dir>/crypto.stdout.log` and
/// `<dir>/crypto.stderr.log`, replacing the files from the previous run.
/// Jobs that didn't capture output are left alone.
#[derive(Debug, Clone)]
pub struct LogSink {
    dir: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl LogSink {
    pub fn new(dir: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            dir: dir.into(),
            fs,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stdout_path(&self, job: &str) -> PathBuf {
        self.dir.join(format!("{job}.stdout.log"))
    }

    pub fn stderr_path(&self, job: &str) -> PathBuf {
        self.dir.join(format!("{job}.stderr.log"))
    }

    pub fn write_captured(&self, result: &JobResult) -> Result<()> {
        if let Some(ref stdout) = result.stdout {
            let path = self.stdout_path(&result.job);
            self.fs.write(&path, stdout)?;
            debug!(job = %result.job, path = ?path, bytes = stdout.len(), "wrote stdout log");
        }
        if let Some(ref stderr) = result.stderr {
            let path = self.stderr_path(&result.job);
            self.fs.write(&path, stderr)?;
            debug!(job = %result.job, path = ?path, bytes = stderr.len(), "wrote stderr log");
        }
        Ok(())
    }
}
