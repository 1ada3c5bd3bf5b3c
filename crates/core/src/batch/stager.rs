//! Scratch staging and result synchronization.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{error, info};

use crate::config::BatchConfig;

use super::error::BatchError;

/// Runs one rsync invocation, surfacing a non-zero exit as an error.
async fn run_rsync(
    rsync_path: &Path,
    args: &[String],
    source: &Path,
    destination: &Path,
) -> Result<(), BatchError> {
    let output = Command::new(rsync_path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BatchError::RsyncNotFound {
                    path: rsync_path.to_path_buf(),
                }
            } else {
                BatchError::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BatchError::SyncFailed {
            from: source.to_path_buf(),
            to: destination.to_path_buf(),
            code: output.status.code(),
            stderr: if stderr.is_empty() {
                None
            } else {
                Some(stderr.to_string())
            },
        });
    }

    Ok(())
}

/// Appends a trailing slash so rsync copies directory contents.
fn contents_of(dir: &Path) -> String {
    format!("{}/", dir.to_string_lossy().trim_end_matches('/'))
}

/// Mirrors the project tree into scratch storage and enters it.
pub struct Stager {
    rsync_path: PathBuf,
    excludes: Vec<String>,
}

impl Stager {
    /// Creates a stager from the given configuration.
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            rsync_path: config.rsync_path.clone(),
            excludes: config.excludes.clone(),
        }
    }

    /// Synchronizes `source` into `scratch`, excluding the configured
    /// paths (version control and prior experiment output).
    pub async fn stage(&self, source: &Path, scratch: &Path) -> Result<(), BatchError> {
        tokio::fs::create_dir_all(scratch).await?;

        let mut args = vec!["-ar".to_string()];
        for exclude in &self.excludes {
            args.push(format!("--exclude={}", exclude));
        }
        args.push(contents_of(source));
        args.push(contents_of(scratch));

        info!("Staging {:?} -> {:?}", source, scratch);
        run_rsync(&self.rsync_path, &args, source, scratch).await
    }

    /// Changes the working directory into the staged tree.
    ///
    /// This is the one explicit error branch in the batch flow: a failed
    /// change is logged and terminates the flow before training starts.
    pub fn enter(&self, scratch: &Path) -> Result<(), BatchError> {
        if let Err(e) = std::env::set_current_dir(scratch) {
            error!("Could not change into staged directory {:?}: {}", scratch, e);
            return Err(BatchError::WorkdirChangeFailed {
                path: scratch.to_path_buf(),
                source: e,
            });
        }
        info!("Working directory is now {:?}", scratch);
        Ok(())
    }
}

/// Mirrors experiment output back to persistent project storage.
pub struct ResultSync {
    rsync_path: PathBuf,
}

impl ResultSync {
    /// Creates a result sync from the given configuration.
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            rsync_path: config.rsync_path.clone(),
        }
    }

    /// Copies `experiments_dir` into `project_dir`. Only the tool's exit
    /// status is checked.
    pub async fn sync_back(
        &self,
        experiments_dir: &Path,
        project_dir: &Path,
    ) -> Result<(), BatchError> {
        tokio::fs::create_dir_all(project_dir).await?;

        let args = vec![
            "-a".to_string(),
            experiments_dir.to_string_lossy().to_string(),
            contents_of(project_dir),
        ];

        info!("Syncing results {:?} -> {:?}", experiments_dir, project_dir);
        run_rsync(&self.rsync_path, &args, experiments_dir, project_dir).await
    }
}
