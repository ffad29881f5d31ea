//! SQLite backend implementation.
//!
//! This module provides the SQLite implementation of [`RecordStore`](crate::core::RecordStore).
//! It supports both in-memory databases (great for testing) and file-based
//! databases.
//!
//! # Features
//!
//! - In-memory and file-based modes
//! - Uniqueness of `test_id` enforced by the primary key
//! - Immediate write transactions with a configurable busy timeout
//! - WAL mode for file databases, so readers do not block on writers
//!
//! # Example
//!
//! ```no_run
//! use labstore_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE test_records (
//!     test_id TEXT NOT NULL PRIMARY KEY,
//!     clinic_id TEXT NOT NULL,
//!     patient_id TEXT,
//!     test_type TEXT,
//!     result TEXT NOT NULL,
//!     result_value REAL,
//!     unit TEXT,
//!     collected_at TEXT,
//!     created_at TEXT NOT NULL
//! );
//!
//! CREATE INDEX idx_test_records_clinic ON test_records (clinic_id, created_at);
//! ```

mod backend;
mod schema;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};
