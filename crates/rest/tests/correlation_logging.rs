//! Correlation logging tests.
//!
//! Every request gets its own correlation id, returned in the
//! `x-correlation-id` header, and each lifecycle stage is logged under it
//! before the response is produced.

mod common;

use async_trait::async_trait;
use labstore_persistence::core::RecordStore;
use labstore_persistence::error::{BackendError, StorageResult};
use labstore_persistence::types::{NewTestRecord, TestRecord};
use labstore_rest::ServerConfig;
use labstore_rest::correlation::{RequestKind, Stage};
use serde_json::json;

use common::assertions::correlation_id;
use common::fixtures::{RecordFixture, positive_t1};
use common::harness::RestTestHarness;

#[tokio::test]
async fn test_successful_create_stages() {
    let harness = RestTestHarness::new_sqlite();

    let response = harness.server.post("/tests").json(&positive_t1()).await;
    response.assert_status_ok();
    let id = correlation_id(&response);

    assert_eq!(
        harness.stages(id),
        vec![
            Stage::Received,
            Stage::Validated,
            Stage::PersistAttempt,
            Stage::Committed,
        ]
    );

    let entries = harness.sink.entries_for(id);
    let kind = RequestKind::CreateTest;
    assert!(entries.iter().all(|e| e.request_kind == kind));
    let committed = entries.last().unwrap();
    assert_eq!(committed.details.test_id.as_deref(), Some("t1"));
    assert_eq!(committed.details.clinic_id.as_deref(), Some("c1"));
    assert!(committed.details.created_at.is_some());
}

#[tokio::test]
async fn test_validation_failure_stages() {
    let harness = RestTestHarness::new_sqlite();

    let payload = RecordFixture::new("t1", "c1", "ok")
        .without("result")
        .json();
    let response = harness.server.post("/tests").json(&payload).await;
    response.assert_status_bad_request();
    let id = correlation_id(&response);

    assert_eq!(
        harness.stages(id),
        vec![Stage::Received, Stage::ValidationFailed]
    );
    let failed = harness.sink.entries_for(id).pop().unwrap();
    assert_eq!(failed.details.errors, vec!["result is required"]);
}

#[tokio::test]
async fn test_malformed_body_is_logged() {
    let harness = RestTestHarness::new_sqlite();

    let response = harness.server.post("/tests").text("nope").await;
    let id = correlation_id(&response);

    assert_eq!(
        harness.stages(id),
        vec![Stage::Received, Stage::ValidationFailed]
    );
}

#[tokio::test]
async fn test_conflict_stages() {
    let harness = RestTestHarness::new_sqlite();
    harness
        .server
        .post("/tests")
        .json(&positive_t1())
        .await
        .assert_status_ok();

    let response = harness.server.post("/tests").json(&positive_t1()).await;
    let id = correlation_id(&response);

    assert_eq!(
        harness.stages(id),
        vec![
            Stage::Received,
            Stage::Validated,
            Stage::PersistAttempt,
            Stage::Conflict,
        ]
    );
}

#[tokio::test]
async fn test_query_stages_include_count() {
    let harness = RestTestHarness::new_sqlite();
    for test_id in ["a", "b"] {
        harness
            .server
            .post("/tests")
            .json(&RecordFixture::new(test_id, "c1", "ok").json())
            .await
            .assert_status_ok();
    }

    let response = harness.server.get("/tests?clinic_id=c1").await;
    let id = correlation_id(&response);

    assert_eq!(
        harness.stages(id),
        vec![Stage::Received, Stage::Validated, Stage::Committed]
    );
    let committed = harness.sink.entries_for(id).pop().unwrap();
    assert_eq!(committed.request_kind, RequestKind::QueryTests);
    assert_eq!(committed.details.count, Some(2));
}

#[tokio::test]
async fn test_missing_clinic_id_is_logged() {
    let harness = RestTestHarness::new_sqlite();

    let response = harness.server.get("/tests").await;
    let id = correlation_id(&response);

    assert_eq!(
        harness.stages(id),
        vec![Stage::Received, Stage::ValidationFailed]
    );
}

#[tokio::test]
async fn test_every_request_gets_a_new_id() {
    let harness = RestTestHarness::new_sqlite();

    let first = correlation_id(&harness.server.post("/tests").json(&json!({})).await);
    let second = correlation_id(&harness.server.post("/tests").json(&json!({})).await);
    let third = correlation_id(&harness.server.get("/tests?clinic_id=c1").await);

    assert_ne!(first, second);
    assert_ne!(second, third);
    assert_eq!(harness.stages(first).len(), 2);
    assert_eq!(harness.stages(second).len(), 2);
}

/// A store whose writes fail and whose reads succeed.
struct ReadOnlyStore;

#[async_trait]
impl RecordStore for ReadOnlyStore {
    fn backend_name(&self) -> &'static str {
        "read-only"
    }

    async fn insert(&self, _record: NewTestRecord) -> StorageResult<TestRecord> {
        Err(BackendError::Unavailable {
            backend_name: "read-only".to_string(),
            message: "writes disabled".to_string(),
        }
        .into())
    }

    async fn query_by_clinic(&self, _clinic_id: &str) -> StorageResult<Vec<TestRecord>> {
        Ok(Vec::new())
    }

    async fn read(&self, _test_id: &str) -> StorageResult<Option<TestRecord>> {
        Ok(None)
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_storage_failure_is_rolled_back() {
    let harness = RestTestHarness::new(ReadOnlyStore, ServerConfig::for_testing());

    let response = harness.server.post("/tests").json(&positive_t1()).await;
    let id = correlation_id(&response);

    assert_eq!(
        harness.stages(id),
        vec![
            Stage::Received,
            Stage::Validated,
            Stage::PersistAttempt,
            Stage::RolledBack,
        ]
    );
    let rolled_back = harness.sink.entries_for(id).pop().unwrap();
    assert!(
        rolled_back
            .details
            .error
            .as_deref()
            .is_some_and(|e| e.contains("read-only"))
    );
}

#[tokio::test]
async fn test_health_checks_are_not_logged() {
    let harness = RestTestHarness::new_sqlite();

    harness.server.get("/health").await.assert_status_ok();
    harness.server.get("/_readiness").await.assert_status_ok();

    assert!(harness.sink.is_empty());
}
