//! Cluster batch flow.
//!
//! What the submitted job actually executes: load the cluster environment,
//! stage the project tree to scratch, train there, and sync the experiment
//! output back to persistent storage.

use std::path::Path;
use tracing::info;

use crate::batch::{EnvironmentLoader, ResultSync, Stager};
use crate::config::Config;
use crate::pipeline::Pipeline;

use super::FlowError;

/// The batch flow: EnvironmentLoader → Stager → Trainer → ResultSync.
pub struct BatchFlow<P: Pipeline> {
    config: Config,
    pipeline: P,
}

impl<P: Pipeline> BatchFlow<P> {
    /// Creates a new batch flow.
    pub fn new(config: Config, pipeline: P) -> Self {
        Self { config, pipeline }
    }

    /// Runs the whole flow. The pipeline configuration path and run-name
    /// prefix come from the job's positional arguments and are forwarded
    /// verbatim to the trainer.
    pub async fn run(&self, pipeline_config: &Path, prefix: &str) -> Result<(), FlowError> {
        let batch = &self.config.batch;

        let env = EnvironmentLoader::new(batch);
        env.load().await?;
        env.gpu_diagnostic().await;

        let stager = Stager::new(batch);
        let project_tree = std::env::current_dir()?;
        stager.stage(&project_tree, &batch.scratch_dir).await?;
        stager.enter(&batch.scratch_dir)?;

        self.pipeline
            .train(pipeline_config, prefix, Some(&batch.gpus))
            .await?;

        ResultSync::new(batch)
            .sync_back(&self.config.pipeline.experiments_dir, &batch.project_dir)
            .await?;

        info!("Batch flow completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchError;
    use crate::config::Config;
    use crate::testing::MockPipeline;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_failing_stage_stops_flow_before_training() {
        let mut config = Config::default();
        config.batch.modules.clear();
        config.batch.rsync_path = PathBuf::from("/nonexistent/rsync");

        let flow = BatchFlow::new(config, MockPipeline::new());
        let result = flow
            .run(Path::new("parameters/test-cms-v2.yaml"), "test-cms-v2-")
            .await;

        assert!(matches!(
            result,
            Err(FlowError::Batch(BatchError::RsyncNotFound { .. }))
        ));
        assert_eq!(flow.pipeline.train_count().await, 0);
    }

    #[tokio::test]
    async fn test_failing_workdir_change_stops_flow_before_training() {
        let temp = TempDir::new().unwrap();

        // rsync stand-in that removes the scratch dir again, so the
        // directory change after staging has nothing to enter.
        let rsync = temp.path().join("rsync");
        tokio::fs::write(
            &rsync,
            "#!/bin/sh\nfor a in \"$@\"; do last=\"$a\"; done\nrmdir \"${last%/}\"\n",
        )
        .await
        .unwrap();
        let mut perms = tokio::fs::metadata(&rsync).await.unwrap().permissions();
        perms.set_mode(0o755);
        tokio::fs::set_permissions(&rsync, perms).await.unwrap();

        let mut config = Config::default();
        config.batch.modules.clear();
        config.batch.rsync_path = rsync;
        config.batch.scratch_dir = temp.path().join("scratch");

        let flow = BatchFlow::new(config, MockPipeline::new());
        let result = flow
            .run(Path::new("parameters/test-cms-v2.yaml"), "test-cms-v2-")
            .await;

        assert!(matches!(
            result,
            Err(FlowError::Batch(BatchError::WorkdirChangeFailed { .. }))
        ));
        assert_eq!(flow.pipeline.train_count().await, 0);
    }
}
