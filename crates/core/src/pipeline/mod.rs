//! Pipeline module wrapping the external training framework.
//!
//! The external tool owns all training and evaluation semantics; this
//! module invokes its `train` and `evaluate` subcommands synchronously,
//! resolves the experiment directory a run produced, and drives the
//! frozen-graph load check.

mod checker;
mod cli;
mod error;
mod experiments;
mod traits;

pub use checker::FrozenGraphChecker;
pub use cli::CliPipeline;
pub use error::PipelineError;
pub use experiments::{latest_experiment, remove_matching_experiments};
pub use traits::{ModelChecker, Pipeline};
