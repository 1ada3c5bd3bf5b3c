//! Flow orchestration.
//!
//! Both flows are strictly sequential: every step is a synchronous
//! external-process invocation awaited to completion, and the first error
//! aborts all remaining steps. There is no retry, rollback, or locking;
//! concurrent runs against the same paths are unsupported.

mod batch;
mod smoke;

pub use batch::BatchFlow;
pub use smoke::SmokeFlow;

use thiserror::Error;

use crate::batch::BatchError;
use crate::converter::ConverterError;
use crate::fetcher::FetchError;
use crate::pipeline::PipelineError;
use crate::splitter::SplitterError;

/// Error type for flow execution; wraps the failing step's error.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Fetch step failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Conversion step failed: {0}")]
    Convert(#[from] ConverterError),

    #[error("Validation split failed: {0}")]
    Split(#[from] SplitterError),

    #[error("Pipeline step failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Batch step failed: {0}")]
    Batch(#[from] BatchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
