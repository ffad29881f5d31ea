//! Core storage traits and abstractions.
//!
//! This module provides the [`RecordStore`] trait, the contract every storage
//! backend implements. Request handlers depend only on this trait; the
//! concrete backend is chosen at process start and injected.
//!
//! # Example: Implementing a Storage Backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use labstore_persistence::core::RecordStore;
//! use labstore_persistence::error::StorageResult;
//! use labstore_persistence::types::{NewTestRecord, TestRecord};
//!
//! struct MyBackend {
//!     // ... backend-specific fields
//! }
//!
//! #[async_trait]
//! impl RecordStore for MyBackend {
//!     fn backend_name(&self) -> &'static str {
//!         "my-backend"
//!     }
//!
//!     async fn insert(&self, record: NewTestRecord) -> StorageResult<TestRecord> {
//!         // enforce test_id uniqueness inside the storage engine
//!         todo!()
//!     }
//!
//!     // ... remaining operations
//! }
//! ```

mod storage;

pub use storage::RecordStore;
