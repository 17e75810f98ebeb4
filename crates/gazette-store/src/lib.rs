//! # gazette-store
//!
//! The `LogStore` abstraction: an unsynchronized, append-only event store
//! holding one JSON record per line. The query engine depends only on this
//! trait; production backs it with a real file, tests with an in-memory
//! buffer.

use async_trait::async_trait;

use gazette_core::Result;

pub mod file;
pub mod memory;

pub use file::FileLogStore;
pub use memory::MemoryLogStore;

/// An append-only store of newline-delimited log records.
///
/// No locking is provided: a reader racing an append sees whatever was
/// flushed at open time, and a reader racing a truncate may observe a
/// partial or empty store. This matches the deployment's best-effort
/// consistency expectations for an admin debugging tool.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Append one record line. The line must not contain a newline.
    async fn append(&self, line: &str) -> Result<()>;

    /// Read every stored line, oldest first. Blank lines are skipped.
    async fn read_all(&self) -> Result<Vec<String>>;

    /// Remove every stored record. Irreversible.
    async fn truncate(&self) -> Result<()>;
}
