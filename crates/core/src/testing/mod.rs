//! Mock implementations of the seam traits for testing.
//!
//! These let flow tests assert orchestration behavior (ordering,
//! fail-fast, invocation counts) without any external tools installed.

mod mock_checker;
mod mock_converter;
mod mock_fetcher;
mod mock_pipeline;

pub use mock_checker::MockChecker;
pub use mock_converter::MockConverter;
pub use mock_fetcher::{MockFetcher, RecordedFetch};
pub use mock_pipeline::{MockPipeline, RecordedEvaluation, RecordedTraining};
