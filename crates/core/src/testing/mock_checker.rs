//! Mock model-load checker for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::pipeline::{ModelChecker, PipelineError};

/// Mock implementation of the ModelChecker trait.
#[derive(Debug, Default)]
pub struct MockChecker {
    checks: Arc<RwLock<Vec<PathBuf>>>,
    next_error: Arc<RwLock<Option<PipelineError>>>,
}

impl MockChecker {
    /// Create a new mock checker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all checked frozen-graph paths.
    pub async fn recorded_checks(&self) -> Vec<PathBuf> {
        self.checks.read().await.clone()
    }

    /// Number of checks performed.
    pub async fn check_count(&self) -> usize {
        self.checks.read().await.len()
    }

    /// Configure the next check to fail.
    pub async fn fail_next(&self) {
        *self.next_error.write().await = Some(PipelineError::ModelLoadFailed {
            path: PathBuf::from("mock-frozen-graph.pb"),
            code: Some(1),
        });
    }
}

#[async_trait]
impl ModelChecker for MockChecker {
    async fn check(&self, frozen_graph: &Path) -> Result<(), PipelineError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.checks.write().await.push(frozen_graph.to_path_buf());
        Ok(())
    }
}
