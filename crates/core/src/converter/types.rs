//! Types for the converter module.

use std::path::PathBuf;

/// A single conversion: one input ntuple, one shared output directory.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// The ntuple file to convert.
    pub input_path: PathBuf,
    /// Directory the per-event record files are written into.
    pub output_dir: PathBuf,
}

/// Result of a completed conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// The input that was converted.
    pub input_path: PathBuf,
    /// Wall-clock duration of the tool invocation.
    pub duration_ms: u64,
}
