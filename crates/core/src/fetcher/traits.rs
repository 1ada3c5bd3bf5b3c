//! Trait definitions for the fetcher module.

use async_trait::async_trait;
use std::path::Path;

use super::error::FetchError;

/// Result of fetching a single remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file was downloaded to the destination path.
    Downloaded { bytes: u64 },
    /// The destination already existed; nothing was downloaded.
    Skipped,
}

/// Downloads remote files to local paths.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Fetches `url` into `dest`, skipping the download if `dest` exists.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<FetchOutcome, FetchError>;
}
