//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during ntuple conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Postprocessing tool binary not found.
    #[error("Postprocessing tool not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed { path: PathBuf },

    /// The tool exited non-zero.
    #[error("Conversion failed for {input}: {reason}")]
    ConversionFailed {
        input: PathBuf,
        reason: String,
        stderr: Option<String>,
    },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(
        input: PathBuf,
        reason: impl Into<String>,
        stderr: Option<String>,
    ) -> Self {
        Self::ConversionFailed {
            input,
            reason: reason.into(),
            stderr,
        }
    }
}
