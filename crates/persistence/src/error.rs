//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates record-state errors (conflicts) from
//! concurrency errors and backend failures, so callers can map each class to
//! a different response.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Record state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Lock contention errors
    #[error(transparent)]
    Concurrency(#[from] ConcurrencyError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns true if this error is a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StorageError::Resource(ResourceError::AlreadyExists { .. })
        )
    }

    /// Returns the conflicting `test_id`, if this is a conflict.
    pub fn conflicting_test_id(&self) -> Option<&str> {
        match self {
            StorageError::Resource(ResourceError::AlreadyExists { test_id }) => Some(test_id),
            _ => None,
        }
    }
}

/// Errors related to record state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A record with the given `test_id` already exists.
    #[error("test record already exists: {test_id}")]
    AlreadyExists { test_id: String },
}

/// Errors related to concurrent access to the store.
#[derive(Error, Debug)]
pub enum ConcurrencyError {
    /// The database stayed locked by another writer past the busy timeout.
    #[error("storage is locked by a concurrent writer: {message}")]
    LockContention { message: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("connection pool exhausted for {backend_name}")]
    PoolExhausted { backend_name: String },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked) => {
                StorageError::Concurrency(ConcurrencyError::LockContention {
                    message: err.to_string(),
                })
            }
            _ => StorageError::Backend(BackendError::Internal {
                backend_name: "sqlite".to_string(),
                message: err.to_string(),
                source: Some(Box::new(err)),
            }),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(_err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
    }
}
