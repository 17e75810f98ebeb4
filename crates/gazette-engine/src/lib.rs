//! # gazette-engine
//!
//! The log query engine: reads the whole event log from a [`LogStore`] on
//! every call, drops unparseable lines, and produces either a filtered
//! newest-first listing or an aggregate statistics report. Also exposes the
//! destructive full-clear operation.
//!
//! Each call is a single synchronous pass over an in-memory vector; there is
//! no streaming, caching, or coordination with concurrent writers (see the
//! store docs for the accepted read-during-truncate race).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use gazette_core::{LogRecord, Result};
use gazette_store::LogStore;

pub mod query;
pub mod stats;

pub use query::{ListLogsParams, ListLogsResponse, PageSummary, Pagination};
pub use stats::{ByLevel, NoiseSummary, SlowRequest, StatsReport, TopUser};

/// Query engine over an append-only log store.
#[derive(Clone)]
pub struct LogQueryEngine {
    store: Arc<dyn LogStore>,
}

impl LogQueryEngine {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// Read and parse every record, oldest first. Lines that fail JSON
    /// parsing are dropped here and never reach a filter or a counter.
    async fn load(&self) -> Result<Vec<LogRecord>> {
        let lines = self.store.read_all().await?;
        let line_count = lines.len();
        let records: Vec<LogRecord> = lines.iter().map(String::as_str).filter_map(LogRecord::parse).collect();
        let malformed = line_count - records.len();
        if malformed > 0 {
            debug!(
                line_count,
                malformed_count = malformed,
                "Dropped unparseable log lines"
            );
        }
        Ok(records)
    }

    /// Filtered, paginated, newest-first listing.
    pub async fn list_logs(&self, params: &ListLogsParams) -> Result<ListLogsResponse> {
        let records = self.load().await?;
        let response = query::run(records, params);
        debug!(
            result_count = response.summary.showing,
            total = response.pagination.total,
            "Listed logs"
        );
        Ok(response)
    }

    /// Aggregate statistics over all records minus the fixed noise set,
    /// relative to the current wall clock.
    pub async fn stats(&self) -> Result<StatsReport> {
        self.stats_at(Utc::now()).await
    }

    /// Same as [`stats`](Self::stats) with an injected clock, for
    /// deterministic trailing-window computation in tests.
    pub async fn stats_at(&self, now: DateTime<Utc>) -> Result<StatsReport> {
        let records = self.load().await?;
        Ok(stats::compute(&records, now))
    }

    /// Truncate the log to empty. Irreversible; the caller's identity is
    /// recorded in the audit trail.
    pub async fn clear_logs(&self, actor: &str) -> Result<()> {
        self.store.truncate().await?;
        warn!(actor, op = "clear_logs", "Event log cleared by admin");
        Ok(())
    }
}
