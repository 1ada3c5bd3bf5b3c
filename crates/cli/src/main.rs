use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pfpipe_core::{
    load_config, validate_config, BatchFlow, CliPipeline, Config, Converter, FrozenGraphChecker,
    HttpFetcher, JobScript, PostprocessConverter, SmokeFlow,
};

#[derive(Parser)]
#[command(name = "pfpipe", version, about = "Particle-flow training pipeline orchestrator")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "PFPIPE_CONFIG", default_value = "pfpipe.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch sample data, convert it, and run a short training end to end
    Smoke,
    /// Run the staged training flow inside a scheduled cluster job
    Batch {
        /// Pipeline configuration file forwarded to the trainer
        pipeline_config: PathBuf,
        /// Run-name prefix forwarded to the trainer
        prefix: String,
    },
    /// Print the scheduler submission script for the batch flow
    JobScript {
        /// Pipeline configuration file the job will train with
        pipeline_config: PathBuf,
        /// Run-name prefix the job will train with
        prefix: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    info!("Loading configuration from {:?}", cli.config);
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    match cli.command {
        Command::Smoke => run_smoke(config).await,
        Command::Batch {
            pipeline_config,
            prefix,
        } => run_batch(config, &pipeline_config, &prefix).await,
        Command::JobScript {
            pipeline_config,
            prefix,
        } => {
            let script = JobScript::new(config.batch.directives.clone());
            print!("{}", script.render(&pipeline_config, &prefix));
            Ok(())
        }
    }
}

async fn run_smoke(config: Config) -> Result<()> {
    let fetcher = HttpFetcher::new(&config.fetch).context("Failed to build HTTP fetcher")?;
    let converter = PostprocessConverter::new(config.postprocess.clone());
    converter
        .validate()
        .await
        .context("Postprocessing tool not usable")?;
    let pipeline = CliPipeline::new(&config.pipeline);
    let checker = FrozenGraphChecker::new(&config.checker);

    SmokeFlow::new(config, fetcher, converter, pipeline, checker)
        .run()
        .await
        .context("Smoke flow failed")
}

async fn run_batch(config: Config, pipeline_config: &PathBuf, prefix: &str) -> Result<()> {
    let pipeline = CliPipeline::new(&config.pipeline);

    BatchFlow::new(config, pipeline)
        .run(pipeline_config, prefix)
        .await
        .context("Batch flow failed")
}
