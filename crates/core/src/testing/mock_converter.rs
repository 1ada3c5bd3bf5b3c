//! Mock converter for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::{ConversionJob, ConversionResult, Converter, ConverterError};

/// Mock implementation of the Converter trait.
///
/// By default it behaves like the real tool from the flow's point of
/// view: each converted ntuple `<stem>.root` produces one record file
/// `<stem>_0.pkl` in the output directory.
#[derive(Debug)]
pub struct MockConverter {
    jobs: Arc<RwLock<Vec<ConversionJob>>>,
    next_error: Arc<RwLock<Option<ConverterError>>>,
    create_outputs: bool,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            create_outputs: true,
        }
    }

    /// A converter that records jobs but never produces output files.
    pub fn without_outputs(mut self) -> Self {
        self.create_outputs = false;
        self
    }

    /// Get all recorded conversion jobs.
    pub async fn recorded_jobs(&self) -> Vec<ConversionJob> {
        self.jobs.read().await.clone()
    }

    /// Number of conversions performed.
    pub async fn conversion_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Configure the next conversion to fail.
    pub async fn fail_next(&self) {
        *self.next_error.write().await = Some(ConverterError::conversion_failed(
            PathBuf::from("mock-input.root"),
            "injected failure",
            None,
        ));
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        if self.create_outputs {
            tokio::fs::create_dir_all(&job.output_dir).await?;
            let stem = job
                .input_path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "record".to_string());
            tokio::fs::write(job.output_dir.join(format!("{}_0.pkl", stem)), b"records")
                .await?;
        }

        let input_path = job.input_path.clone();
        self.jobs.write().await.push(job);

        Ok(ConversionResult {
            input_path,
            duration_ms: 1,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_mock_converter_creates_record_file() {
        let temp = TempDir::new().unwrap();
        let converter = MockConverter::new();

        converter
            .convert(ConversionJob {
                input_path: PathBuf::from("data/root/pfntuple_2.root"),
                output_dir: temp.path().to_path_buf(),
            })
            .await
            .unwrap();

        assert!(temp.path().join("pfntuple_2_0.pkl").exists());
        assert_eq!(converter.conversion_count().await, 1);
    }

    #[tokio::test]
    async fn test_mock_converter_without_outputs() {
        let temp = TempDir::new().unwrap();
        let converter = MockConverter::new().without_outputs();

        converter
            .convert(ConversionJob {
                input_path: PathBuf::from("pfntuple_1.root"),
                output_dir: temp.path().to_path_buf(),
            })
            .await
            .unwrap();

        assert!(!temp.path().join("pfntuple_1_0.pkl").exists());
    }

    #[tokio::test]
    async fn test_mock_converter_error_injection() {
        let temp = TempDir::new().unwrap();
        let converter = MockConverter::new();
        converter.fail_next().await;

        let result = converter
            .convert(ConversionJob {
                input_path: PathBuf::from("pfntuple_1.root"),
                output_dir: temp.path().to_path_buf(),
            })
            .await;

        assert!(result.is_err());
        // the error is consumed; the next conversion succeeds
        assert!(converter
            .convert(ConversionJob {
                input_path: PathBuf::from("pfntuple_1.root"),
                output_dir: temp.path().to_path_buf(),
            })
            .await
            .is_ok());
    }
}
