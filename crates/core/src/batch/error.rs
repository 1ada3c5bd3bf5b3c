//! Error types for the batch module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the batch flow.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Loading cluster software modules failed.
    #[error("Module load failed with exit code {code:?}")]
    ModuleLoadFailed {
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// rsync binary not found.
    #[error("rsync not found at path: {path}")]
    RsyncNotFound { path: PathBuf },

    /// An rsync invocation exited non-zero.
    #[error("Sync failed from {from} to {to} (exit code {code:?})")]
    SyncFailed {
        from: PathBuf,
        to: PathBuf,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// Changing into the staged scratch directory failed.
    #[error("Could not change into staged directory {path}")]
    WorkdirChangeFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
