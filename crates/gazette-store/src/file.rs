//! File-backed log store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use gazette_core::Result;

use crate::LogStore;

/// Log store backed by a single newline-delimited JSON file.
///
/// Every read loads the whole file into memory; there is no streaming and no
/// file locking. Each operation is attempted exactly once. A missing file
/// reads as an empty store; the first append creates it.
#[derive(Debug, Clone)]
pub struct FileLogStore {
    path: PathBuf,
}

impl FileLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogStore for FileLogStore {
    async fn append(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<String>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Log file not present, reading as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(contents
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn truncate(&self) -> Result<()> {
        tokio::fs::write(&self.path, "").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLogStore::new(dir.path().join("nonexistent.log"));
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_creates_file_and_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLogStore::new(dir.path().join("events.log"));

        store.append(r#"{"type":"login_success"}"#).await.unwrap();
        store.append(r#"{"type":"article_created"}"#).await.unwrap();

        let lines = store.read_all().await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"type":"login_success"}"#);
        assert_eq!(lines[1], r#"{"type":"article_created"}"#);
    }

    #[tokio::test]
    async fn test_blank_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.log");
        tokio::fs::write(&path, "{\"a\":1}\n\n  \n{\"b\":2}\n")
            .await
            .unwrap();

        let store = FileLogStore::new(&path);
        assert_eq!(store.read_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_truncate_empties_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLogStore::new(dir.path().join("events.log"));

        store.append(r#"{"type":"like"}"#).await.unwrap();
        store.truncate().await.unwrap();

        assert!(store.read_all().await.unwrap().is_empty());
        // Appends still work after a truncate
        store.append(r#"{"type":"unlike"}"#).await.unwrap();
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }
}
