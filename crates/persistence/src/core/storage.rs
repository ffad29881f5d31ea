//! Core record storage trait.
//!
//! This module defines the [`RecordStore`] trait: insert-once persistence of
//! test records with uniqueness on `test_id` and lookup by `clinic_id`.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{NewTestRecord, TestRecord};

/// Storage trait for medical test records.
///
/// Records are written once and never updated or deleted through this trait.
///
/// # Uniqueness
///
/// `insert` must enforce `test_id` uniqueness inside the storage engine (a
/// primary-key or unique constraint evaluated in the same write), so that two
/// concurrent inserts of the same `test_id` can never both succeed. A
/// read-then-write check in application code does not satisfy this contract.
///
/// # Example
///
/// ```ignore
/// use labstore_persistence::core::RecordStore;
/// use labstore_persistence::types::NewTestRecord;
///
/// async fn example<S: RecordStore>(storage: &S) -> Result<(), StorageError> {
///     let stored = storage.insert(NewTestRecord::new("t1", "c1", "positive")).await?;
///     println!("Stored at {}", stored.created_at());
///
///     // A second insert with the same test_id is a conflict
///     let err = storage
///         .insert(NewTestRecord::new("t1", "c1", "negative"))
///         .await
///         .unwrap_err();
///     assert!(err.is_conflict());
///
///     let records = storage.query_by_clinic("c1").await?;
///     assert_eq!(records.len(), 1);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Inserts a new record, assigning its `created_at` at commit time.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(AlreadyExists)` - A record with the same `test_id` exists;
    ///   the existing record is left untouched
    /// * `StorageError::Concurrency` - The store stayed locked by other writers
    /// * `StorageError::Backend` - Any other persistence failure; nothing was written
    async fn insert(&self, record: NewTestRecord) -> StorageResult<TestRecord>;

    /// Returns every record owned by `clinic_id`, ordered by `created_at`
    /// then `test_id`.
    ///
    /// An unknown clinic yields an empty vector, not an error.
    async fn query_by_clinic(&self, clinic_id: &str) -> StorageResult<Vec<TestRecord>>;

    /// Reads a single record by its `test_id`.
    async fn read(&self, test_id: &str) -> StorageResult<Option<TestRecord>>;

    /// Verifies that the storage engine is reachable.
    async fn health_check(&self) -> StorageResult<()>;
}
