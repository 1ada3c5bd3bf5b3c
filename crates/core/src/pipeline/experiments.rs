//! Experiment directory resolution.
//!
//! The external pipeline names each run's output directory by the supplied
//! prefix plus a generated suffix; this layer only ever needs "the most
//! recent directory matching the prefix".

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::info;

use super::error::PipelineError;

/// Returns the most recently modified experiment directory whose name
/// starts with `prefix`.
pub async fn latest_experiment(dir: &Path, prefix: &str) -> Result<PathBuf, PipelineError> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    // A missing experiments dir means no run produced one; any other
    // read_dir failure is a real I/O error and surfaces as such.
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PipelineError::NoExperiment {
                dir: dir.to_path_buf(),
                prefix: prefix.to_string(),
            })
        }
        Err(e) => return Err(PipelineError::Io(e)),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(prefix));
        if !matches {
            continue;
        }

        let modified = entry
            .metadata()
            .await?
            .modified()
            .unwrap_or(SystemTime::UNIX_EPOCH);

        if newest.as_ref().is_none_or(|(t, _)| modified > *t) {
            newest = Some((modified, path));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| PipelineError::NoExperiment {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
        })
}

/// Deletes every experiment directory matching `prefix` under `dir`.
///
/// Called before a run so a stale experiment can never be picked up as the
/// "latest" one afterwards. A missing experiments dir is not an error.
pub async fn remove_matching_experiments(dir: &Path, prefix: &str) -> std::io::Result<()> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(prefix));
        if matches && path.is_dir() {
            info!("Removing prior experiment {:?}", path);
            fs::remove_dir_all(&path).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_latest_experiment_picks_most_recent() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("test-cms-v2-older")).await.unwrap();
        // mtime granularity on some filesystems is a full second
        tokio::time::sleep(Duration::from_millis(1100)).await;
        fs::create_dir(temp.path().join("test-cms-v2-newer")).await.unwrap();

        let latest = latest_experiment(temp.path(), "test-cms-v2-").await.unwrap();
        assert_eq!(latest, temp.path().join("test-cms-v2-newer"));
    }

    #[tokio::test]
    async fn test_latest_experiment_ignores_other_prefixes() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("other-run")).await.unwrap();

        let result = latest_experiment(temp.path(), "test-cms-v2-").await;
        assert!(matches!(result, Err(PipelineError::NoExperiment { .. })));
    }

    #[tokio::test]
    async fn test_latest_experiment_ignores_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("test-cms-v2-notadir"), b"x")
            .await
            .unwrap();

        let result = latest_experiment(temp.path(), "test-cms-v2-").await;
        assert!(matches!(result, Err(PipelineError::NoExperiment { .. })));
    }

    #[tokio::test]
    async fn test_latest_experiment_missing_dir() {
        let temp = TempDir::new().unwrap();
        let result = latest_experiment(&temp.path().join("experiments"), "test-cms-v2-").await;
        assert!(matches!(result, Err(PipelineError::NoExperiment { .. })));
    }

    #[tokio::test]
    async fn test_latest_experiment_unreadable_dir_surfaces_io_error() {
        let temp = TempDir::new().unwrap();
        let not_a_dir = temp.path().join("experiments");
        fs::write(&not_a_dir, b"x").await.unwrap();

        let result = latest_experiment(&not_a_dir, "test-cms-v2-").await;
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }

    #[tokio::test]
    async fn test_remove_matching_experiments() {
        let temp = TempDir::new().unwrap();
        let stale = temp.path().join("test-cms-v2-stale");
        fs::create_dir(&stale).await.unwrap();
        fs::write(stale.join("weights.h5"), b"w").await.unwrap();
        let kept = temp.path().join("other-run");
        fs::create_dir(&kept).await.unwrap();

        remove_matching_experiments(temp.path(), "test-cms-v2-")
            .await
            .unwrap();

        assert!(!stale.exists());
        assert!(kept.exists());
    }

    #[tokio::test]
    async fn test_remove_matching_experiments_missing_dir() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("experiments");
        assert!(remove_matching_experiments(&missing, "test-").await.is_ok());
    }
}
