//! Pipeline implementation invoking the external tool's CLI.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

use crate::config::PipelineConfig;

use super::error::PipelineError;
use super::traits::Pipeline;

/// CLI-based pipeline implementation.
///
/// Training and evaluation output streams straight through to the
/// orchestrator's stdout/stderr; these runs can last hours and their logs
/// belong to the operator, not to this layer.
pub struct CliPipeline {
    tool_path: PathBuf,
}

impl CliPipeline {
    /// Creates a pipeline driver from the given configuration.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            tool_path: config.tool_path.clone(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.tool_path);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    fn map_spawn_error(&self, e: std::io::Error) -> PipelineError {
        if e.kind() == std::io::ErrorKind::NotFound {
            PipelineError::ToolNotFound {
                path: self.tool_path.clone(),
            }
        } else {
            PipelineError::Io(e)
        }
    }
}

/// Formats device indices as a CUDA_VISIBLE_DEVICES value.
fn visible_devices(gpus: &[u32]) -> String {
    gpus.iter()
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl Pipeline for CliPipeline {
    fn name(&self) -> &str {
        "cli"
    }

    async fn train(
        &self,
        config: &Path,
        prefix: &str,
        gpus: Option<&[u32]>,
    ) -> Result<(), PipelineError> {
        let mut cmd = self.command();
        cmd.arg("train").arg("-c").arg(config).arg("-p").arg(prefix);

        if let Some(gpus) = gpus {
            cmd.env("CUDA_VISIBLE_DEVICES", visible_devices(gpus));
        }

        info!("Starting training: config {:?}, prefix '{}'", config, prefix);
        let status = cmd.status().await.map_err(|e| self.map_spawn_error(e))?;

        if !status.success() {
            return Err(PipelineError::TrainFailed {
                code: status.code(),
            });
        }

        info!("Training completed");
        Ok(())
    }

    async fn evaluate(&self, config: &Path, train_dir: &Path) -> Result<(), PipelineError> {
        let mut cmd = self.command();
        cmd.arg("evaluate")
            .arg("-c")
            .arg(config)
            .arg("-t")
            .arg(train_dir);

        info!("Evaluating experiment {:?}", train_dir);
        let status = cmd.status().await.map_err(|e| self.map_spawn_error(e))?;

        if !status.success() {
            return Err(PipelineError::EvaluateFailed {
                train_dir: train_dir.to_path_buf(),
                code: status.code(),
            });
        }

        info!("Evaluation completed");
        Ok(())
    }
}
