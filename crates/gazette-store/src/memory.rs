//! In-memory log store, used by tests and as a stand-in backend.

use async_trait::async_trait;
use tokio::sync::RwLock;

use gazette_core::Result;

use crate::LogStore;

/// Log store holding lines in a `Vec` behind an async `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    lines: RwLock<Vec<String>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pre-populated store from record lines, oldest first.
    pub fn with_lines(lines: impl IntoIterator<Item = String>) -> Self {
        Self {
            lines: RwLock::new(lines.into_iter().collect()),
        }
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn append(&self, line: &str) -> Result<()> {
        self.lines.write().await.push(line.to_string());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<String>> {
        Ok(self
            .lines
            .read()
            .await
            .iter()
            .filter(|l| !l.trim().is_empty())
            .cloned()
            .collect())
    }

    async fn truncate(&self) -> Result<()> {
        self.lines.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_read_truncate_cycle() {
        let store = MemoryLogStore::new();
        store.append(r#"{"type":"like"}"#).await.unwrap();
        store.append(r#"{"type":"unlike"}"#).await.unwrap();

        let lines = store.read_all().await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"type":"like"}"#);

        store.truncate().await.unwrap();
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_with_lines_preserves_order() {
        let store = MemoryLogStore::with_lines(vec!["{\"a\":1}".to_string(), "{\"b\":2}".to_string()]);
        let lines = store.read_all().await.unwrap();
        assert_eq!(lines, vec!["{\"a\":1}", "{\"b\":2}"]);
    }
}
