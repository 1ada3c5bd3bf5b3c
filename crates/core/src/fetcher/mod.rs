//! Fetcher module for downloading pre-generated simulation ntuples.
//!
//! Downloads are idempotent: a destination file that already exists is
//! skipped without touching the network. Any other failure aborts the
//! calling flow.

mod error;
mod http;
mod traits;

pub use error::FetchError;
pub use http::HttpFetcher;
pub use traits::{FetchOutcome, Fetcher};

/// Derives the local file name for a remote URL (its last path segment).
///
/// A URL with no path after the host has no usable file name.
pub fn dest_file_name(url: &str) -> Result<String, FetchError> {
    let invalid = || FetchError::InvalidUrl {
        url: url.to_string(),
    };

    let (_, rest) = url.split_once("://").ok_or_else(invalid)?;
    let (_, name) = rest
        .trim_end_matches('/')
        .rsplit_once('/')
        .ok_or_else(invalid)?;

    if name.is_empty() {
        return Err(invalid());
    }
    Ok(name.to_string())
}
