//! Mock pipeline for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::pipeline::{Pipeline, PipelineError};

/// A recorded `train` invocation.
#[derive(Debug, Clone)]
pub struct RecordedTraining {
    pub config: PathBuf,
    pub prefix: String,
    pub gpus: Option<Vec<u32>>,
}

/// A recorded `evaluate` invocation.
#[derive(Debug, Clone)]
pub struct RecordedEvaluation {
    pub config: PathBuf,
    pub train_dir: PathBuf,
}

/// Mock implementation of the Pipeline trait.
///
/// Can be told to create an experiment directory on `train`, mimicking
/// the external tool's side effect so flows can resolve it afterwards.
#[derive(Debug, Default)]
pub struct MockPipeline {
    trainings: Arc<RwLock<Vec<RecordedTraining>>>,
    evaluations: Arc<RwLock<Vec<RecordedEvaluation>>>,
    next_train_error: Arc<RwLock<Option<PipelineError>>>,
    next_evaluate_error: Arc<RwLock<Option<PipelineError>>>,
    created_experiment: Option<(PathBuf, String)>,
}

impl MockPipeline {
    /// Create a new mock pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// On `train`, create `<experiments_dir>/<dir_name>`.
    pub fn with_created_experiment(
        mut self,
        experiments_dir: PathBuf,
        dir_name: impl Into<String>,
    ) -> Self {
        self.created_experiment = Some((experiments_dir, dir_name.into()));
        self
    }

    /// Get all recorded training invocations.
    pub async fn recorded_trainings(&self) -> Vec<RecordedTraining> {
        self.trainings.read().await.clone()
    }

    /// Get all recorded evaluation invocations.
    pub async fn recorded_evaluations(&self) -> Vec<RecordedEvaluation> {
        self.evaluations.read().await.clone()
    }

    /// Number of training invocations.
    pub async fn train_count(&self) -> usize {
        self.trainings.read().await.len()
    }

    /// Number of evaluation invocations.
    pub async fn evaluate_count(&self) -> usize {
        self.evaluations.read().await.len()
    }

    /// Configure the next `train` call to fail.
    pub async fn fail_next_train(&self) {
        *self.next_train_error.write().await =
            Some(PipelineError::TrainFailed { code: Some(1) });
    }

    /// Configure the next `evaluate` call to fail.
    pub async fn fail_next_evaluate(&self) {
        *self.next_evaluate_error.write().await = Some(PipelineError::EvaluateFailed {
            train_dir: PathBuf::from("mock-experiment"),
            code: Some(1),
        });
    }
}

#[async_trait]
impl Pipeline for MockPipeline {
    fn name(&self) -> &str {
        "mock"
    }

    async fn train(
        &self,
        config: &Path,
        prefix: &str,
        gpus: Option<&[u32]>,
    ) -> Result<(), PipelineError> {
        if let Some(err) = self.next_train_error.write().await.take() {
            return Err(err);
        }

        if let Some((experiments_dir, dir_name)) = &self.created_experiment {
            tokio::fs::create_dir_all(experiments_dir.join(dir_name)).await?;
        }

        self.trainings.write().await.push(RecordedTraining {
            config: config.to_path_buf(),
            prefix: prefix.to_string(),
            gpus: gpus.map(|g| g.to_vec()),
        });

        Ok(())
    }

    async fn evaluate(&self, config: &Path, train_dir: &Path) -> Result<(), PipelineError> {
        if let Some(err) = self.next_evaluate_error.write().await.take() {
            return Err(err);
        }

        self.evaluations.write().await.push(RecordedEvaluation {
            config: config.to_path_buf(),
            train_dir: train_dir.to_path_buf(),
        });

        Ok(())
    }
}
