//! Converter module for turning downloaded ntuples into training records.
//!
//! This module provides the `Converter` trait and the implementation that
//! shells out to the external postprocessing tool. Each invocation converts
//! one ntuple file into one or more per-event record files inside a shared
//! output directory.

mod error;
mod tool;
mod traits;
mod types;

pub use error::ConverterError;
pub use tool::PostprocessConverter;
pub use traits::Converter;
pub use types::{ConversionJob, ConversionResult};
