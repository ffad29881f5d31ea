//! Append-only destinations for correlation log entries.

use parking_lot::Mutex;
use tracing::Level;
use uuid::Uuid;

use super::{LogEntry, Stage};

/// Tracing target used for lifecycle events.
pub const CORRELATION_TARGET: &str = "labstore::correlation";

/// An append-only destination for [`LogEntry`] values.
///
/// Implementations must not fail or block for long; a sink that cannot
/// write drops the entry.
pub trait LogSink: Send + Sync {
    /// Appends one entry.
    fn append(&self, entry: &LogEntry);
}

/// Emits each entry as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

macro_rules! lifecycle_event {
    ($level:expr, $entry:expr) => {{
        let entry: &LogEntry = $entry;
        let created_at = entry.details.created_at.map(|t| t.to_rfc3339());
        let errors = (!entry.details.errors.is_empty()).then(|| entry.details.errors.join("; "));
        tracing::event!(
            target: CORRELATION_TARGET,
            $level,
            correlation_id = %entry.correlation_id,
            request_kind = %entry.request_kind,
            stage = %entry.stage,
            elapsed_ms = entry.elapsed_ms,
            test_id = entry.details.test_id.as_deref(),
            clinic_id = entry.details.clinic_id.as_deref(),
            created_at = created_at.as_deref(),
            count = entry.details.count,
            errors = errors.as_deref(),
            error = entry.details.error.as_deref(),
            "{}",
            entry.stage
        );
    }};
}

impl LogSink for TracingSink {
    fn append(&self, entry: &LogEntry) {
        match entry.stage {
            Stage::RolledBack => lifecycle_event!(Level::ERROR, entry),
            Stage::ValidationFailed | Stage::Conflict => lifecycle_event!(Level::WARN, entry),
            _ => lifecycle_event!(Level::INFO, entry),
        }
    }
}

/// Keeps entries in memory, in append order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all entries.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Returns the entries of one request, in append order.
    pub fn entries_for(&self, correlation_id: Uuid) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.correlation_id == correlation_id)
            .cloned()
            .collect()
    }

    /// Returns the stages logged for one request, in append order.
    pub fn stages_for(&self, correlation_id: Uuid) -> Vec<Stage> {
        self.entries_for(correlation_id)
            .into_iter()
            .map(|e| e.stage)
            .collect()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl LogSink for MemorySink {
    fn append(&self, entry: &LogEntry) {
        self.entries.lock().push(entry.clone());
    }
}
