//! SQLite backend integration tests.
//!
//! These tests verify the SQLite backend implementation against the
//! `RecordStore` API.

use std::sync::Arc;

use chrono::DateTime;

use labstore_persistence::backends::sqlite::{SqliteBackend, SqliteBackendConfig};
use labstore_persistence::core::RecordStore;
use labstore_persistence::error::{ConcurrencyError, ResourceError, StorageError};
use labstore_persistence::types::NewTestRecord;

fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}

fn create_file_backend(dir: &tempfile::TempDir) -> SqliteBackend {
    let backend = SqliteBackend::open(dir.path().join("records.db"))
        .expect("Failed to open SQLite database");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}

// ============================================================================
// Insert Tests
// ============================================================================

#[tokio::test]
async fn test_insert_record() {
    let backend = create_backend();

    let stored = backend
        .insert(NewTestRecord::new("t1", "c1", "positive"))
        .await
        .unwrap();

    assert_eq!(stored.test_id(), "t1");
    assert_eq!(stored.clinic_id(), "c1");
    assert_eq!(stored.result(), "positive");
    assert!(stored.created_at().timestamp() > 0);
}

#[tokio::test]
async fn test_insert_keeps_optional_fields() {
    let backend = create_backend();
    let collected_at = DateTime::parse_from_rfc3339("2024-02-28T08:30:00+02:00").unwrap();

    backend
        .insert(
            NewTestRecord::new("t1", "c1", "elevated")
                .with_patient_id("p-7")
                .with_test_type("glucose")
                .with_result_value(7.8)
                .with_unit("mmol/L")
                .with_collected_at(collected_at),
        )
        .await
        .unwrap();

    let read = backend.read("t1").await.unwrap().unwrap();
    assert_eq!(read.patient_id(), Some("p-7"));
    assert_eq!(read.test_type(), Some("glucose"));
    assert_eq!(read.result_value(), Some(7.8));
    assert_eq!(read.unit(), Some("mmol/L"));
    assert_eq!(read.collected_at(), Some(collected_at));
}

#[tokio::test]
async fn test_insert_duplicate_fails() {
    let backend = create_backend();

    backend
        .insert(NewTestRecord::new("duplicate-id", "c1", "positive"))
        .await
        .unwrap();

    let result = backend
        .insert(NewTestRecord::new("duplicate-id", "c2", "negative"))
        .await;

    match result {
        Err(StorageError::Resource(ResourceError::AlreadyExists { test_id })) => {
            assert_eq!(test_id, "duplicate-id");
        }
        other => panic!("expected a conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_does_not_overwrite() {
    let backend = create_backend();

    let original = backend
        .insert(NewTestRecord::new("t1", "c1", "positive"))
        .await
        .unwrap();

    let _ = backend
        .insert(NewTestRecord::new("t1", "c1", "negative").with_patient_id("p-2"))
        .await
        .unwrap_err();

    let read = backend.read("t1").await.unwrap().unwrap();
    assert_eq!(read, original);
    assert!(backend.query_by_clinic("c1").await.unwrap().len() == 1);
}

#[tokio::test]
async fn test_insert_returns_what_read_returns() {
    let backend = create_backend();

    let stored = backend
        .insert(NewTestRecord::new("t1", "c1", "positive"))
        .await
        .unwrap();

    let read = backend.read("t1").await.unwrap();
    assert_eq!(read, Some(stored));
}

// ============================================================================
// Query Tests
// ============================================================================

#[tokio::test]
async fn test_query_by_clinic_filters() {
    let backend = create_backend();

    for (test_id, clinic_id) in [("t1", "c1"), ("t2", "c2"), ("t3", "c1")] {
        let record = NewTestRecord::new(test_id, clinic_id, "negative");
        backend.insert(record).await.unwrap();
    }

    let records = backend.query_by_clinic("c1").await.unwrap();
    let ids: Vec<_> = records.iter().map(|r| r.test_id()).collect();
    assert_eq!(ids, vec!["t1", "t3"]);
    assert!(records.iter().all(|r| r.clinic_id() == "c1"));
}

#[tokio::test]
async fn test_query_unknown_clinic_is_empty() {
    let backend = create_backend();
    backend
        .insert(NewTestRecord::new("t1", "c1", "positive"))
        .await
        .unwrap();

    let records = backend.query_by_clinic("c2").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_query_is_ordered_by_created_at() {
    let backend = create_backend();

    for id in ["t-c", "t-a", "t-b"] {
        backend
            .insert(NewTestRecord::new(id, "c1", "positive"))
            .await
            .unwrap();
    }

    let records = backend.query_by_clinic("c1").await.unwrap();
    let created: Vec<_> = records.iter().map(|r| r.created_at()).collect();
    let mut sorted = created.clone();
    sorted.sort();
    assert_eq!(created, sorted);
}

#[tokio::test]
async fn test_repeated_queries_are_identical() {
    let backend = create_backend();
    backend
        .insert(NewTestRecord::new("t1", "c1", "positive"))
        .await
        .unwrap();
    backend
        .insert(NewTestRecord::new("t2", "c1", "negative"))
        .await
        .unwrap();

    let first = backend.query_by_clinic("c1").await.unwrap();
    let second = backend.query_by_clinic("c1").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_clinic_id_is_exact_match() {
    let backend = create_backend();
    backend
        .insert(NewTestRecord::new("t1", "clinic-1", "positive"))
        .await
        .unwrap();

    for clinic_id in ["clinic", "CLINIC-1", "clinic-1 "] {
        let records = backend.query_by_clinic(clinic_id).await.unwrap();
        assert!(records.is_empty(), "{clinic_id:?} matched");
    }
    assert_eq!(backend.query_by_clinic("clinic-1").await.unwrap().len(), 1);
}

// ============================================================================
// Read Tests
// ============================================================================

#[tokio::test]
async fn test_read_missing_returns_none() {
    let backend = create_backend();
    assert!(backend.read("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_health_check() {
    let backend = create_backend();
    assert!(backend.health_check().await.is_ok());
    assert_eq!(backend.backend_name(), "sqlite");
}

// ============================================================================
// File Database Tests
// ============================================================================

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let backend = create_file_backend(&dir);
        backend
            .insert(NewTestRecord::new("t1", "c1", "positive"))
            .await
            .unwrap();
    }

    let backend = create_file_backend(&dir);
    let records = backend.query_by_clinic("c1").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].test_id(), "t1");

    let err = backend
        .insert(NewTestRecord::new("t1", "c1", "positive"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_same_test_id() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(create_file_backend(&dir));

    let mut handles = Vec::new();
    for i in 0..8 {
        let backend = Arc::clone(&backend);
        handles.push(tokio::spawn(async move {
            backend
                .insert(NewTestRecord::new("shared", "c1", format!("result-{}", i)))
                .await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) if e.is_conflict() => conflicts += 1,
            Err(e) => panic!("unexpected storage error: {}", e),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(backend.query_by_clinic("c1").await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_distinct_ids() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(create_file_backend(&dir));

    let mut handles = Vec::new();
    for i in 0..16 {
        let backend = Arc::clone(&backend);
        handles.push(tokio::spawn(async move {
            backend
                .insert(NewTestRecord::new(format!("t{}", i), "c1", "negative"))
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(backend.query_by_clinic("c1").await.unwrap().len(), 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_in_memory() {
    let backend = Arc::new(create_backend());

    let mut handles = Vec::new();
    for _ in 0..6 {
        let backend = Arc::clone(&backend);
        handles.push(tokio::spawn(async move {
            backend
                .insert(NewTestRecord::new("same", "c9", "positive"))
                .await
        }));
    }

    let results: Vec<_> = futures_collect(handles).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(StorageError::is_conflict)
    );
}

#[tokio::test]
async fn test_held_write_lock_is_lock_contention() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.db");
    let config = SqliteBackendConfig {
        busy_timeout_ms: 50,
        max_connections: 2,
        ..Default::default()
    };
    let backend = SqliteBackend::with_config(&path, config).unwrap();
    backend.init_schema().unwrap();
    assert_eq!(backend.config().busy_timeout_ms, 50);

    let holder = rusqlite::Connection::open(&path).unwrap();
    holder.execute_batch("BEGIN IMMEDIATE").unwrap();

    let result = backend
        .insert(NewTestRecord::new("t1", "c1", "positive"))
        .await;
    assert!(matches!(
        result,
        Err(StorageError::Concurrency(ConcurrencyError::LockContention { .. }))
    ));

    holder.execute_batch("ROLLBACK").unwrap();
    assert!(backend.read("t1").await.unwrap().is_none());

    backend
        .insert(NewTestRecord::new("t1", "c1", "positive"))
        .await
        .unwrap();
    assert_eq!(backend.query_by_clinic("c1").await.unwrap().len(), 1);
}

async fn futures_collect<T>(handles: Vec<tokio::task::JoinHandle<T>>) -> Vec<T> {
    let mut out = Vec::with_capacity(handles.len());
    for handle in handles {
        out.push(handle.await.expect("task panicked"));
    }
    out
}
