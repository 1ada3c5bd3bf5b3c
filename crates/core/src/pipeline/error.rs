//! Error types for the pipeline module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while driving the external pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Pipeline tool binary not found.
    #[error("Pipeline tool not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// The `train` subcommand exited non-zero.
    #[error("Training failed with exit code {code:?}")]
    TrainFailed { code: Option<i32> },

    /// The `evaluate` subcommand exited non-zero.
    #[error("Evaluation failed for {train_dir} with exit code {code:?}")]
    EvaluateFailed {
        train_dir: PathBuf,
        code: Option<i32>,
    },

    /// No experiment directory matched the run prefix.
    #[error("No experiment directory matching prefix '{prefix}' under {dir}")]
    NoExperiment { dir: PathBuf, prefix: String },

    /// The frozen-graph load check failed.
    #[error("Frozen graph failed to load: {path} (exit code {code:?})")]
    ModelLoadFailed { path: PathBuf, code: Option<i32> },

    /// Checker script not found.
    #[error("Model load checker not found at path: {path}")]
    CheckerNotFound { path: PathBuf },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
