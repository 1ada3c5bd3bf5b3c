//! Converter implementation backed by the external postprocessing tool.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::PostprocessConfig;

use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionJob, ConversionResult};

/// How much of the tool's stderr tail is kept in error messages.
const STDERR_TAIL_BYTES: usize = 4096;

/// Invokes the external ntuple postprocessing tool, one process per file.
pub struct PostprocessConverter {
    config: PostprocessConfig,
}

impl PostprocessConverter {
    /// Creates a new converter with the given configuration.
    pub fn new(config: PostprocessConfig) -> Self {
        Self { config }
    }

    /// Builds the tool argument list for one job.
    fn build_args(&self, job: &ConversionJob) -> Vec<String> {
        let mut args = vec![
            "--input".to_string(),
            job.input_path.to_string_lossy().to_string(),
            "--outpath".to_string(),
            job.output_dir.to_string_lossy().to_string(),
        ];

        if self.config.save_normalized_table {
            args.push("--save-normalized-table".to_string());
        }

        args.extend([
            "--events-per-file".to_string(),
            self.config.events_per_file.to_string(),
        ]);

        args
    }
}

#[async_trait]
impl Converter for PostprocessConverter {
    fn name(&self) -> &str {
        "postprocess"
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        if !job.input_path.exists() {
            return Err(ConverterError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        tokio::fs::create_dir_all(&job.output_dir).await.map_err(|_| {
            ConverterError::OutputDirectoryFailed {
                path: job.output_dir.clone(),
            }
        })?;

        let args = self.build_args(&job);
        debug!("Running {:?} {:?}", self.config.tool_path, args);

        let start = Instant::now();
        let output = Command::new(&self.config.tool_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::ToolNotFound {
                        path: self.config.tool_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConverterError::conversion_failed(
                job.input_path.clone(),
                format!("tool exited with code {:?}", output.status.code()),
                if stderr.is_empty() {
                    None
                } else {
                    Some(stderr_tail(&stderr).to_string())
                },
            ));
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Converted {:?} into {:?} in {} ms",
            job.input_path, job.output_dir, duration_ms
        );

        Ok(ConversionResult {
            input_path: job.input_path,
            duration_ms,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        // Spawn the tool; a missing binary is the only readiness failure.
        // Exit status is not checked, help output varies by tool version.
        let result = Command::new(&self.config.tool_path)
            .arg("--help")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        if let Err(e) = result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(ConverterError::ToolNotFound {
                    path: self.config.tool_path.clone(),
                });
            }
            return Err(ConverterError::Io(e));
        }

        Ok(())
    }
}

/// Last `STDERR_TAIL_BYTES` of the tool's stderr, starting on a char
/// boundary so multi-byte output cannot split mid-character.
fn stderr_tail(stderr: &str) -> &str {
    let mut start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
    while !stderr.is_char_boundary(start) {
        start += 1;
    }
    &stderr[start..]
}
