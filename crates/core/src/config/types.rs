use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub postprocess: PostprocessConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub checker: CheckerConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Dataset layout configuration.
///
/// The smoke flow works inside `<data_dir>/<sample>/`:
/// downloaded ntuples land in `root/`, converted per-event records in
/// `raw/`, and the held-out validation records in `val/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_sample")]
    pub sample: String,
}

impl DataConfig {
    /// Directory the raw ntuple files are downloaded into.
    pub fn download_dir(&self) -> PathBuf {
        self.data_dir.join(&self.sample).join("root")
    }

    /// Directory the converted per-event record files are written into.
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join(&self.sample).join("raw")
    }

    /// Directory holding the held-out validation records.
    pub fn val_dir(&self) -> PathBuf {
        self.data_dir.join(&self.sample).join("val")
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sample: default_sample(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_sample() -> String {
    "TTbar_14TeV_TuneCUETP8M1_cfi".to_string()
}

/// Remote ntuple fetch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Remote files to download into the download directory.
    #[serde(default = "default_urls")]
    pub urls: Vec<String>,
    /// The simulation file host serves a certificate we cannot validate.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
    /// Per-request timeout in seconds (default: 600)
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            urls: default_urls(),
            accept_invalid_certs: default_accept_invalid_certs(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_urls() -> Vec<String> {
    vec![
        "https://zenodo.org/record/4559324/files/pfntuple_1.root".to_string(),
        "https://zenodo.org/record/4559324/files/pfntuple_2.root".to_string(),
        "https://zenodo.org/record/4559324/files/pfntuple_3.root".to_string(),
    ]
}

fn default_accept_invalid_certs() -> bool {
    true
}

fn default_fetch_timeout() -> u64 {
    600
}

/// Configuration for the external ntuple postprocessing tool
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostprocessConfig {
    /// Path to the postprocessing executable.
    #[serde(default = "default_postprocess_tool")]
    pub tool_path: PathBuf,
    /// Event cap per produced record file.
    #[serde(default = "default_events_per_file")]
    pub events_per_file: u32,
    /// Request normalized-table output from the tool.
    #[serde(default = "default_save_normalized_table")]
    pub save_normalized_table: bool,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            tool_path: default_postprocess_tool(),
            events_per_file: default_events_per_file(),
            save_normalized_table: default_save_normalized_table(),
        }
    }
}

fn default_postprocess_tool() -> PathBuf {
    PathBuf::from("mlpf-postprocess")
}

fn default_events_per_file() -> u32 {
    5
}

fn default_save_normalized_table() -> bool {
    true
}

/// Configuration for the external training/evaluation pipeline
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Path to the pipeline executable (`train` / `evaluate` subcommands).
    #[serde(default = "default_pipeline_tool")]
    pub tool_path: PathBuf,
    /// Pipeline configuration file forwarded via `-c`.
    #[serde(default = "default_pipeline_config")]
    pub config_path: PathBuf,
    /// Run-name prefix forwarded via `-p`; experiment dirs are named
    /// prefix plus a pipeline-generated suffix.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Directory the pipeline creates experiment dirs under.
    #[serde(default = "default_experiments_dir")]
    pub experiments_dir: PathBuf,
    /// Fixed-name record file held out for validation after conversion.
    #[serde(default = "default_holdout_file")]
    pub holdout_file: String,
    /// Location of the frozen graph inside a completed experiment dir.
    #[serde(default = "default_frozen_graph_subpath")]
    pub frozen_graph_subpath: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tool_path: default_pipeline_tool(),
            config_path: default_pipeline_config(),
            prefix: default_prefix(),
            experiments_dir: default_experiments_dir(),
            holdout_file: default_holdout_file(),
            frozen_graph_subpath: default_frozen_graph_subpath(),
        }
    }
}

fn default_pipeline_tool() -> PathBuf {
    PathBuf::from("mlpf-pipeline")
}

fn default_pipeline_config() -> PathBuf {
    PathBuf::from("parameters/test-cms-v2.yaml")
}

fn default_prefix() -> String {
    "test-cms-v2-".to_string()
}

fn default_experiments_dir() -> PathBuf {
    PathBuf::from("experiments")
}

fn default_holdout_file() -> String {
    "pfntuple_3_0.pkl".to_string()
}

fn default_frozen_graph_subpath() -> PathBuf {
    PathBuf::from("model_frozen/frozen_graph.pb")
}

/// Configuration for the frozen-graph load checker
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckerConfig {
    /// Path to the checker script; it takes the frozen-graph path as its
    /// single argument and its exit status is the verdict.
    #[serde(default = "default_checker_script")]
    pub script_path: PathBuf,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            script_path: default_checker_script(),
        }
    }
}

fn default_checker_script() -> PathBuf {
    PathBuf::from("scripts/test_load_tfmodel.py")
}

/// Cluster batch flow configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Software modules loaded after a `module purge`.
    #[serde(default = "default_modules")]
    pub modules: Vec<String>,
    /// Accelerator device indices made visible to the training process.
    #[serde(default = "default_gpus")]
    pub gpus: Vec<u32>,
    /// Scratch directory the project tree is staged into.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    /// Persistent storage the experiment output is synced back to.
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,
    /// Path to the rsync binary.
    #[serde(default = "default_rsync_path")]
    pub rsync_path: PathBuf,
    /// Paths excluded when staging the project tree to scratch.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub directives: SchedulerDirectives,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            modules: default_modules(),
            gpus: default_gpus(),
            scratch_dir: default_scratch_dir(),
            project_dir: default_project_dir(),
            rsync_path: default_rsync_path(),
            excludes: default_excludes(),
            directives: SchedulerDirectives::default(),
        }
    }
}

fn default_modules() -> Vec<String> {
    vec![
        "cuda/11.2".to_string(),
        "cudnn/8.1".to_string(),
        "python/3.8".to_string(),
    ]
}

fn default_gpus() -> Vec<u32> {
    vec![0, 1, 2, 3]
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("/scratch/pfpipe")
}

fn default_project_dir() -> PathBuf {
    PathBuf::from("/project/pfpipe")
}

fn default_rsync_path() -> PathBuf {
    PathBuf::from("rsync")
}

fn default_excludes() -> Vec<String> {
    vec![".git".to_string(), "experiments".to_string()]
}

/// Scheduler directives emitted as the job script header.
///
/// These are consumed by the batch scheduler, not by the script body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerDirectives {
    #[serde(default = "default_walltime")]
    pub walltime: String,
    #[serde(default = "default_nodes")]
    pub nodes: u32,
    #[serde(default = "default_gpus_per_node")]
    pub gpus_per_node: u32,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub partition: Option<String>,
    #[serde(default = "default_exclusive")]
    pub exclusive: bool,
    #[serde(default = "default_output_log")]
    pub output_log: PathBuf,
    #[serde(default = "default_error_log")]
    pub error_log: PathBuf,
}

impl Default for SchedulerDirectives {
    fn default() -> Self {
        Self {
            walltime: default_walltime(),
            nodes: default_nodes(),
            gpus_per_node: default_gpus_per_node(),
            account: None,
            partition: None,
            exclusive: default_exclusive(),
            output_log: default_output_log(),
            error_log: default_error_log(),
        }
    }
}

fn default_walltime() -> String {
    "24:00:00".to_string()
}

fn default_nodes() -> u32 {
    1
}

fn default_gpus_per_node() -> u32 {
    4
}

fn default_exclusive() -> bool {
    true
}

fn default_output_log() -> PathBuf {
    PathBuf::from("logs/slurm-%x-%j.out")
}

fn default_error_log() -> PathBuf {
    PathBuf::from("logs/slurm-%x-%j.err")
}
