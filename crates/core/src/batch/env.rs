//! Cluster environment preparation.

use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::BatchConfig;

use super::error::BatchError;

/// Purges and loads cluster software modules, then reports GPU visibility.
pub struct EnvironmentLoader {
    modules: Vec<String>,
}

impl EnvironmentLoader {
    /// Creates an environment loader from the given configuration.
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            modules: config.modules.clone(),
        }
    }

    /// Runs `module purge` followed by `module load <m>...`.
    ///
    /// `module` is a shell function on clusters, so this goes through a
    /// login shell. An empty module list is a no-op.
    pub async fn load(&self) -> Result<(), BatchError> {
        if self.modules.is_empty() {
            info!("No cluster modules configured, skipping module load");
            return Ok(());
        }

        let script = format!("module purge && module load {}", self.modules.join(" "));
        info!("Loading cluster modules: {}", self.modules.join(", "));

        let output = Command::new("bash")
            .arg("-lc")
            .arg(&script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BatchError::ModuleLoadFailed {
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

    /// Queries accelerator visibility as a diagnostic.
    ///
    /// Informational only: a missing or failing `nvidia-smi` logs a
    /// warning and the flow continues.
    pub async fn gpu_diagnostic(&self) {
        let result = Command::new("nvidia-smi")
            .arg("-L")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {
                for line in String::from_utf8_lossy(&output.stdout).lines() {
                    info!("{}", line);
                }
            }
            Ok(output) => {
                warn!(
                    "nvidia-smi exited with code {:?}; no GPUs visible?",
                    output.status.code()
                );
            }
            Err(e) => {
                warn!("nvidia-smi not available: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_with_no_modules_is_noop() {
        let loader = EnvironmentLoader::new(&BatchConfig {
            modules: vec![],
            ..Default::default()
        });
        assert!(loader.load().await.is_ok());
    }

    #[tokio::test]
    async fn test_gpu_diagnostic_never_fails() {
        // Runs on machines with or without nvidia-smi.
        let loader = EnvironmentLoader::new(&BatchConfig::default());
        loader.gpu_diagnostic().await;
    }
}
