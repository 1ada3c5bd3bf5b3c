//! Trait definitions for the pipeline module.

use async_trait::async_trait;
use std::path::Path;

use super::error::PipelineError;

/// Drives the external training/evaluation pipeline.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Returns the name of this pipeline implementation.
    fn name(&self) -> &str;

    /// Runs one training job to completion.
    ///
    /// `gpus`, when given, restricts the devices visible to the child
    /// process. The experiment directory is created by the tool, named by
    /// `prefix` plus a generated suffix. No retry, no timeout.
    async fn train(
        &self,
        config: &Path,
        prefix: &str,
        gpus: Option<&[u32]>,
    ) -> Result<(), PipelineError>;

    /// Evaluates a completed training, writing predictions into the
    /// experiment directory.
    async fn evaluate(&self, config: &Path, train_dir: &Path) -> Result<(), PipelineError>;
}

/// Verifies that a frozen model graph artifact can be loaded.
#[async_trait]
pub trait ModelChecker: Send + Sync {
    /// The external checker's exit status is the sole verdict.
    async fn check(&self, frozen_graph: &Path) -> Result<(), PipelineError>;
}
