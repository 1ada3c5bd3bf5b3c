//! Error types for the fetcher module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while downloading remote files.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL has no usable file name component.
    #[error("Cannot derive a file name from URL: {url}")]
    InvalidUrl { url: String },

    /// The HTTP request failed or returned a non-success status.
    #[error("Download failed for {url}: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Writing the downloaded body to disk failed.
    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to build the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
