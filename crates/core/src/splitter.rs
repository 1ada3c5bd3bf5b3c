//! Validation splitter.
//!
//! Relocates one fixed-named record file out of the conversion output into
//! a held-out validation directory. The file name is fixed by configuration;
//! there is no pattern matching or selection logic.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;

/// Errors that can occur while holding out a validation record.
#[derive(Debug, Error)]
pub enum SplitterError {
    /// The expected record file was not produced by the conversion step.
    #[error("Expected record file not found: {path}")]
    RecordNotFound { path: PathBuf },

    /// Failed to create the validation directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move the record file.
    #[error("Failed to move record from {from} to {to}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Moves a fixed-named record file into the validation directory.
pub struct ValidationSplitter {
    val_dir: PathBuf,
}

impl ValidationSplitter {
    /// Creates a splitter targeting the given validation directory.
    pub fn new(val_dir: impl Into<PathBuf>) -> Self {
        Self {
            val_dir: val_dir.into(),
        }
    }

    /// Relocates `raw_dir/<file_name>` into the validation directory.
    ///
    /// The validation directory is created if absent and never cleaned.
    /// A missing source file is an error; the calling flow aborts.
    pub async fn hold_out(
        &self,
        raw_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, SplitterError> {
        let source = raw_dir.join(file_name);
        if !source.exists() {
            return Err(SplitterError::RecordNotFound { path: source });
        }

        fs::create_dir_all(&self.val_dir).await.map_err(|e| {
            SplitterError::DirectoryCreationFailed {
                path: self.val_dir.clone(),
                source: e,
            }
        })?;

        let destination = self.val_dir.join(file_name);
        Self::move_file(&source, &destination).await?;

        info!("Held out {:?} for validation", destination);
        Ok(destination)
    }

    /// Rename first; fall back to copy-then-remove across filesystems.
    async fn move_file(source: &Path, destination: &Path) -> Result<(), SplitterError> {
        match fs::rename(source, destination).await {
            Ok(()) => Ok(()),
            Err(e)
                if e.kind() == std::io::ErrorKind::CrossesDevices
                    || e.raw_os_error() == Some(18) =>
            {
                fs::copy(source, destination).await.map_err(|e| {
                    SplitterError::MoveFailed {
                        from: source.to_path_buf(),
                        to: destination.to_path_buf(),
                        source: e,
                    }
                })?;
                fs::remove_file(source)
                    .await
                    .map_err(|e| SplitterError::MoveFailed {
                        from: source.to_path_buf(),
                        to: destination.to_path_buf(),
                        source: e,
                    })
            }
            Err(e) => Err(SplitterError::MoveFailed {
                from: source.to_path_buf(),
                to: destination.to_path_buf(),
                source: e,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_hold_out_moves_record() {
        let temp = TempDir::new().unwrap();
        let raw_dir = temp.path().join("raw");
        let val_dir = temp.path().join("val");
        fs::create_dir_all(&raw_dir).await.unwrap();
        fs::write(raw_dir.join("pfntuple_3_0.pkl"), b"records")
            .await
            .unwrap();

        let splitter = ValidationSplitter::new(&val_dir);
        let moved = splitter.hold_out(&raw_dir, "pfntuple_3_0.pkl").await.unwrap();

        assert_eq!(moved, val_dir.join("pfntuple_3_0.pkl"));
        assert!(moved.exists());
        assert!(!raw_dir.join("pfntuple_3_0.pkl").exists());
    }

    #[tokio::test]
    async fn test_hold_out_missing_record_fails() {
        let temp = TempDir::new().unwrap();
        let raw_dir = temp.path().join("raw");
        fs::create_dir_all(&raw_dir).await.unwrap();

        let splitter = ValidationSplitter::new(temp.path().join("val"));
        let result = splitter.hold_out(&raw_dir, "pfntuple_3_0.pkl").await;

        assert!(matches!(result, Err(SplitterError::RecordNotFound { .. })));
    }

    #[tokio::test]
    async fn test_hold_out_keeps_prior_validation_files() {
        let temp = TempDir::new().unwrap();
        let raw_dir = temp.path().join("raw");
        let val_dir = temp.path().join("val");
        fs::create_dir_all(&raw_dir).await.unwrap();
        fs::create_dir_all(&val_dir).await.unwrap();
        fs::write(val_dir.join("earlier.pkl"), b"old").await.unwrap();
        fs::write(raw_dir.join("pfntuple_3_0.pkl"), b"new")
            .await
            .unwrap();

        let splitter = ValidationSplitter::new(&val_dir);
        splitter.hold_out(&raw_dir, "pfntuple_3_0.pkl").await.unwrap();

        // the validation directory is never cleaned
        assert!(val_dir.join("earlier.pkl").exists());
        assert!(val_dir.join("pfntuple_3_0.pkl").exists());
    }
}
