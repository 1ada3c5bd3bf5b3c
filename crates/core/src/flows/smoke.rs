//! Local data-preparation-and-smoke-test flow.
//!
//! Fetch the sample ntuples, convert them to training records, hold one
//! record out for validation, run a short training, evaluate it, and check
//! that the frozen graph loads.

use std::path::PathBuf;
use tokio::fs;
use tracing::info;

use crate::config::Config;
use crate::converter::{ConversionJob, Converter};
use crate::fetcher::{dest_file_name, Fetcher};
use crate::pipeline::{latest_experiment, remove_matching_experiments, ModelChecker, Pipeline};
use crate::splitter::ValidationSplitter;

use super::FlowError;

/// Extension of the downloaded ntuple files.
const NTUPLE_EXTENSION: &str = "root";

/// The smoke-test flow: Fetcher → Converter → Splitter → Trainer →
/// Evaluator → ModelLoadChecker, in strict program order.
pub struct SmokeFlow<F, C, P, K>
where
    F: Fetcher,
    C: Converter,
    P: Pipeline,
    K: ModelChecker,
{
    config: Config,
    fetcher: F,
    converter: C,
    pipeline: P,
    checker: K,
}

impl<F, C, P, K> SmokeFlow<F, C, P, K>
where
    F: Fetcher,
    C: Converter,
    P: Pipeline,
    K: ModelChecker,
{
    /// Creates a new smoke flow.
    pub fn new(config: Config, fetcher: F, converter: C, pipeline: P, checker: K) -> Self {
        Self {
            config,
            fetcher,
            converter,
            pipeline,
            checker,
        }
    }

    /// Runs the whole flow; the first failing step aborts the rest.
    pub async fn run(&self) -> Result<(), FlowError> {
        self.prepare_dirs().await?;
        self.fetch_all().await?;
        self.convert_all().await?;
        self.hold_out_validation().await?;
        self.train_and_evaluate().await?;
        info!("Smoke flow completed");
        Ok(())
    }

    /// Establishes the directory layout for this run.
    ///
    /// The download dir is kept (existing files make fetches no-ops), the
    /// raw records dir is wiped so no stale records survive between runs,
    /// and prior experiment dirs matching the run prefix are removed.
    async fn prepare_dirs(&self) -> Result<(), FlowError> {
        fs::create_dir_all(self.config.data.download_dir()).await?;

        let raw_dir = self.config.data.raw_dir();
        if raw_dir.exists() {
            fs::remove_dir_all(&raw_dir).await?;
        }
        fs::create_dir_all(&raw_dir).await?;

        fs::create_dir_all(&self.config.pipeline.experiments_dir).await?;
        remove_matching_experiments(
            &self.config.pipeline.experiments_dir,
            &self.config.pipeline.prefix,
        )
        .await?;

        Ok(())
    }

    async fn fetch_all(&self) -> Result<(), FlowError> {
        let download_dir = self.config.data.download_dir();
        for url in &self.config.fetch.urls {
            let dest = download_dir.join(dest_file_name(url)?);
            self.fetcher.fetch(url, &dest).await?;
        }
        Ok(())
    }

    /// Converts every downloaded ntuple, one tool invocation per file.
    async fn convert_all(&self) -> Result<(), FlowError> {
        let inputs = self.ntuple_files().await?;
        info!("Converting {} ntuple files", inputs.len());

        let raw_dir = self.config.data.raw_dir();
        for input_path in inputs {
            self.converter
                .convert(ConversionJob {
                    input_path,
                    output_dir: raw_dir.clone(),
                })
                .await?;
        }
        Ok(())
    }

    async fn hold_out_validation(&self) -> Result<(), FlowError> {
        let splitter = ValidationSplitter::new(self.config.data.val_dir());
        splitter
            .hold_out(
                &self.config.data.raw_dir(),
                &self.config.pipeline.holdout_file,
            )
            .await?;
        Ok(())
    }

    async fn train_and_evaluate(&self) -> Result<(), FlowError> {
        let pipeline_config = &self.config.pipeline;

        self.pipeline
            .train(&pipeline_config.config_path, &pipeline_config.prefix, None)
            .await?;

        let experiment = latest_experiment(
            &pipeline_config.experiments_dir,
            &pipeline_config.prefix,
        )
        .await?;

        self.pipeline
            .evaluate(&pipeline_config.config_path, &experiment)
            .await?;

        self.checker
            .check(&experiment.join(&pipeline_config.frozen_graph_subpath))
            .await?;

        Ok(())
    }

    /// Downloaded ntuple files, in sorted order.
    async fn ntuple_files(&self) -> Result<Vec<PathBuf>, FlowError> {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(self.config.data.download_dir()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == NTUPLE_EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
