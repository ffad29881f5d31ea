//! Labstore Persistence Layer
//!
//! This crate provides the record store behind the labstore service: durable
//! storage of medical test records keyed by a client-supplied `test_id`, with
//! lookup by owning clinic.
//!
//! # Features
//!
//! - **Uniqueness at the storage layer**: duplicate `test_id` inserts are
//!   rejected by the database's primary-key constraint, never overwritten
//! - **Atomic writes**: each insert runs in its own write transaction
//! - **Clinic lookup**: records are queried by `clinic_id` in insertion order
//! - **Distinct error classes**: conflicts are reported separately from
//!   storage failures (lock contention, I/O)
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! # Architecture
//!
//! - [`types`] - The persisted [`TestRecord`](types::TestRecord) and its
//!   pre-insert form [`NewTestRecord`](types::NewTestRecord)
//! - [`error`] - Error types for all operations
//! - [`core`] - The [`RecordStore`](core::RecordStore) trait
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```no_run
//! use labstore_persistence::backends::sqlite::SqliteBackend;
//! use labstore_persistence::core::RecordStore;
//! use labstore_persistence::types::NewTestRecord;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::open("records.db")?;
//! backend.init_schema()?;
//!
//! let stored = backend
//!     .insert(NewTestRecord::new("t1", "c1", "positive"))
//!     .await?;
//! assert_eq!(stored.test_id(), "t1");
//!
//! let records = backend.query_by_clinic("c1").await?;
//! assert_eq!(records.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;
