//! HTTP fetcher implementation backed by reqwest.

use async_trait::async_trait;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::FetchConfig;

use super::error::FetchError;
use super::traits::{FetchOutcome, Fetcher};

/// HTTP-based fetcher implementation.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher from the given configuration.
    ///
    /// Certificate validation is disabled when the config asks for it;
    /// the simulation file hosts routinely serve self-signed certificates.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self { client })
    }

    async fn download_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| FetchError::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        // Write to a .part file and rename on completion so an interrupted
        // download never masquerades as a finished one on re-run.
        let part_path = dest.with_extension(match dest.extension() {
            Some(ext) => format!("{}.part", ext.to_string_lossy()),
            None => "part".to_string(),
        });

        let mut file = File::create(&part_path)
            .await
            .map_err(|source| FetchError::WriteFailed {
                path: part_path.clone(),
                source,
            })?;

        let mut total_bytes = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| FetchError::RequestFailed {
                url: url.to_string(),
                source,
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|source| FetchError::WriteFailed {
                    path: part_path.clone(),
                    source,
                })?;
            total_bytes += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|source| FetchError::WriteFailed {
                path: part_path.clone(),
                source,
            })?;
        drop(file);

        fs::rename(&part_path, dest).await?;

        Ok(total_bytes)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str, dest: &Path) -> Result<FetchOutcome, FetchError> {
        if dest.exists() {
            debug!("Skipping {}, destination {:?} already present", url, dest);
            return Ok(FetchOutcome::Skipped);
        }

        info!("Downloading {} -> {:?}", url, dest);
        let bytes = self.download_to(url, dest).await?;
        info!("Downloaded {:?} ({} bytes)", dest, bytes);

        Ok(FetchOutcome::Downloaded { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_skips_existing_file() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("pfntuple_1.root");
        tokio::fs::write(&dest, b"already here").await.unwrap();

        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
        // The URL is never contacted when the destination exists.
        let outcome = fetcher
            .fetch("https://invalid.example/pfntuple_1.root", &dest)
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Skipped);
        let content = tokio::fs::read(&dest).await.unwrap();
        assert_eq!(content, b"already here");
    }

    #[tokio::test]
    async fn test_fetch_missing_host_fails() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("pfntuple_1.root");

        let config = FetchConfig {
            timeout_secs: 1,
            ..Default::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        let result = fetcher
            .fetch("https://127.0.0.1:1/pfntuple_1.root", &dest)
            .await;

        assert!(matches!(result, Err(FetchError::RequestFailed { .. })));
        assert!(!dest.exists());
    }
}
