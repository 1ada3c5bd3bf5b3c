//! Batch module for running the training flow under a cluster scheduler.
//!
//! Covers everything the submitted job does around the training itself:
//! loading cluster software modules, staging the project tree to scratch,
//! syncing experiment output back to persistent storage, and rendering the
//! scheduler-directive header of the submission script.

mod env;
mod error;
mod job_script;
mod stager;

pub use env::EnvironmentLoader;
pub use error::BatchError;
pub use job_script::JobScript;
pub use stager::{ResultSync, Stager};
