//! Frozen-graph load checker.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

use crate::config::CheckerConfig;

use super::error::PipelineError;
use super::traits::ModelChecker;

/// Invokes the external checker script against a frozen-graph artifact.
pub struct FrozenGraphChecker {
    script_path: PathBuf,
}

impl FrozenGraphChecker {
    /// Creates a checker from the given configuration.
    pub fn new(config: &CheckerConfig) -> Self {
        Self {
            script_path: config.script_path.clone(),
        }
    }
}

#[async_trait]
impl ModelChecker for FrozenGraphChecker {
    async fn check(&self, frozen_graph: &Path) -> Result<(), PipelineError> {
        info!("Checking frozen graph {:?}", frozen_graph);

        let status = Command::new(&self.script_path)
            .arg(frozen_graph)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PipelineError::CheckerNotFound {
                        path: self.script_path.clone(),
                    }
                } else {
                    PipelineError::Io(e)
                }
            })?;

        if !status.success() {
            return Err(PipelineError::ModelLoadFailed {
                path: frozen_graph.to_path_buf(),
                code: status.code(),
            });
        }

        info!("Frozen graph loaded successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    async fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        tokio::fs::write(&path, body).await.unwrap();
        let mut perms = tokio::fs::metadata(&path).await.unwrap().permissions();
        perms.set_mode(0o755);
        tokio::fs::set_permissions(&path, perms).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_check_passes_on_zero_exit() {
        let temp = TempDir::new().unwrap();
        let script = write_script(temp.path(), "check.sh", "#!/bin/sh\nexit 0\n").await;

        let checker = FrozenGraphChecker::new(&CheckerConfig {
            script_path: script,
        });
        let result = checker.check(Path::new("model_frozen/frozen_graph.pb")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_check_fails_on_nonzero_exit() {
        let temp = TempDir::new().unwrap();
        let script = write_script(temp.path(), "check.sh", "#!/bin/sh\nexit 3\n").await;

        let checker = FrozenGraphChecker::new(&CheckerConfig {
            script_path: script,
        });
        let result = checker.check(Path::new("model_frozen/frozen_graph.pb")).await;
        assert!(matches!(
            result,
            Err(PipelineError::ModelLoadFailed { code: Some(3), .. })
        ));
    }

    #[tokio::test]
    async fn test_check_missing_script() {
        let checker = FrozenGraphChecker::new(&CheckerConfig {
            script_path: PathBuf::from("/nonexistent/check.py"),
        });
        let result = checker.check(Path::new("frozen_graph.pb")).await;
        assert!(matches!(result, Err(PipelineError::CheckerNotFound { .. })));
    }
}
