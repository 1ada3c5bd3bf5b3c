pub mod batch;
pub mod config;
pub mod converter;
pub mod fetcher;
pub mod flows;
pub mod pipeline;
pub mod splitter;
pub mod testing;

pub use batch::{BatchError, EnvironmentLoader, JobScript, ResultSync, Stager};
pub use config::{
    load_config, load_config_from_str, validate_config, BatchConfig, CheckerConfig, Config,
    ConfigError, DataConfig, FetchConfig, PipelineConfig, PostprocessConfig, SchedulerDirectives,
};
pub use converter::{ConversionJob, ConversionResult, Converter, ConverterError, PostprocessConverter};
pub use fetcher::{dest_file_name, FetchError, FetchOutcome, Fetcher, HttpFetcher};
pub use flows::{BatchFlow, FlowError, SmokeFlow};
pub use pipeline::{
    latest_experiment, remove_matching_experiments, CliPipeline, FrozenGraphChecker, ModelChecker,
    Pipeline, PipelineError,
};
pub use splitter::{SplitterError, ValidationSplitter};
