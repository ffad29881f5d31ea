//! Request correlation and lifecycle logging.
//!
//! Every inbound request gets a [`RequestContext`] carrying a freshly
//! generated correlation identifier. Handlers thread the context explicitly
//! through each step and report lifecycle [`Stage`]s to the
//! [`CorrelationLogger`], which writes structured [`LogEntry`] values to an
//! append-only [`LogSink`].
//!
//! Logging is a side effect only: nothing the logger does can change a
//! handler's control flow or response.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use labstore_rest::correlation::{
//!     CorrelationLogger, LogDetails, MemorySink, RequestKind, Stage,
//! };
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = CorrelationLogger::new(sink.clone());
//!
//! let ctx = logger.begin(RequestKind::CreateTest);
//! logger.log(&ctx, Stage::Received, LogDetails::new());
//! logger.log(&ctx, Stage::Committed, LogDetails::new().with_test_id("t1"));
//!
//! let entries = sink.entries_for(ctx.correlation_id());
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[1].stage, Stage::Committed);
//! ```

mod sink;

pub use sink::{CORRELATION_TARGET, LogSink, MemorySink, TracingSink};

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use http::HeaderName;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response header carrying the request's correlation id.
pub const CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

/// The kind of request being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// `POST /tests`
    CreateTest,
    /// `GET /tests?clinic_id=...`
    QueryTests,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::CreateTest => write!(f, "create_test"),
            RequestKind::QueryTests => write!(f, "query_tests"),
        }
    }
}

/// Lifecycle stages a request passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// The request arrived.
    Received,
    /// Input passed validation.
    Validated,
    /// Input failed validation; terminal.
    ValidationFailed,
    /// A write is about to be attempted.
    PersistAttempt,
    /// The operation completed; terminal.
    Committed,
    /// The storage layer failed and nothing was written; terminal.
    RolledBack,
    /// The write collided with an existing `test_id`; terminal.
    Conflict,
}

impl Stage {
    /// Returns the stage tag as written to the log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::ValidationFailed => "validation_failed",
            Stage::PersistAttempt => "persist_attempt",
            Stage::Committed => "committed",
            Stage::RolledBack => "rolled_back",
            Stage::Conflict => "conflict",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request context, created by [`CorrelationLogger::begin`].
///
/// Lives only for the duration of the request and is never persisted.
#[derive(Debug, Clone)]
pub struct RequestContext {
    correlation_id: Uuid,
    kind: RequestKind,
    received_at: DateTime<Utc>,
}

impl RequestContext {
    /// Returns the correlation identifier.
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Returns the request kind.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

/// Field-labelled details attached to a log entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogDetails {
    /// The record's `test_id`, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    /// The clinic the request concerns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_id: Option<String>,
    /// Commit time of a stored record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Number of records returned by a query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Validation messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Storage failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogDetails {
    /// Creates empty details.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `test_id`.
    pub fn with_test_id(mut self, test_id: impl Into<String>) -> Self {
        self.test_id = Some(test_id.into());
        self
    }

    /// Sets the `clinic_id`.
    pub fn with_clinic_id(mut self, clinic_id: impl Into<String>) -> Self {
        self.clinic_id = Some(clinic_id.into());
        self
    }

    /// Sets the commit timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the result count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Sets the validation messages.
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    /// Sets the failure description.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// One structured lifecycle log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Correlation identifier of the request.
    pub correlation_id: Uuid,
    /// The request kind.
    pub request_kind: RequestKind,
    /// The lifecycle stage.
    pub stage: Stage,
    /// When the entry was produced.
    pub timestamp: DateTime<Utc>,
    /// Milliseconds since the request was received.
    pub elapsed_ms: i64,
    /// Stage-specific details.
    #[serde(flatten)]
    pub details: LogDetails,
}

/// Assigns correlation identifiers and writes lifecycle entries to a sink.
///
/// Cheap to clone; all clones share the same sink.
#[derive(Clone)]
pub struct CorrelationLogger {
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for CorrelationLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrelationLogger").finish_non_exhaustive()
    }
}

impl Default for CorrelationLogger {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl CorrelationLogger {
    /// Creates a logger writing to the given sink.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Starts tracking a new request and returns its context.
    pub fn begin(&self, kind: RequestKind) -> RequestContext {
        RequestContext {
            correlation_id: Uuid::new_v4(),
            kind,
            received_at: Utc::now(),
        }
    }

    /// Writes one lifecycle entry for the request.
    pub fn log(&self, ctx: &RequestContext, stage: Stage, details: LogDetails) {
        let timestamp = Utc::now();
        let entry = LogEntry {
            correlation_id: ctx.correlation_id,
            request_kind: ctx.kind,
            stage,
            timestamp,
            elapsed_ms: (timestamp - ctx.received_at).num_milliseconds(),
            details,
        };
        self.sink.append(&entry);
    }
}
