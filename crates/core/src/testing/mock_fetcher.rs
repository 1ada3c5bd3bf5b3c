//! Mock fetcher for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::fetcher::{FetchError, FetchOutcome, Fetcher};

/// A recorded fetch call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    pub url: String,
    pub dest: PathBuf,
    pub outcome_skipped: bool,
}

/// Mock implementation of the Fetcher trait.
///
/// Honors the skip-if-exists rule and writes a small stand-in file for
/// "downloads" so downstream steps see real paths.
#[derive(Debug, Default)]
pub struct MockFetcher {
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    next_error: Arc<RwLock<Option<FetchError>>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded fetch calls.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Number of fetch calls (skips included).
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    /// Number of fetches that actually downloaded.
    pub async fn download_count(&self) -> usize {
        self.fetches
            .read()
            .await
            .iter()
            .filter(|f| !f.outcome_skipped)
            .count()
    }

    /// Configure the next fetch to fail.
    pub async fn fail_next(&self) {
        *self.next_error.write().await = Some(FetchError::InvalidUrl {
            url: "mock://injected-failure".to_string(),
        });
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &str, dest: &Path) -> Result<FetchOutcome, FetchError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let skipped = dest.exists();
        if !skipped {
            tokio::fs::write(dest, b"mock ntuple").await?;
        }

        self.fetches.write().await.push(RecordedFetch {
            url: url.to_string(),
            dest: dest.to_path_buf(),
            outcome_skipped: skipped,
        });

        if skipped {
            Ok(FetchOutcome::Skipped)
        } else {
            Ok(FetchOutcome::Downloaded { bytes: 11 })
        }
    }
}
