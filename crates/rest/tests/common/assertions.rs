//! HTTP response assertions.
//!
//! Provides assertion utilities for testing HTTP responses.

use axum_test::TestResponse;
use labstore_rest::CORRELATION_ID_HEADER;
use serde_json::Value;
use uuid::Uuid;

/// Returns the response's correlation id, asserting it is a UUID v4.
pub fn correlation_id(response: &TestResponse) -> Uuid {
    let value = response
        .headers()
        .get(CORRELATION_ID_HEADER)
        .expect("Expected x-correlation-id header");
    let id = Uuid::parse_str(value.to_str().expect("header is ASCII"))
        .expect("x-correlation-id is a UUID");
    assert_eq!(id.get_version_num(), 4, "Expected a UUID v4");
    id
}

/// Asserts the body is a validation failure with exactly these messages.
pub fn assert_validation_errors(body: &Value, expected: &[&str]) {
    assert_eq!(body["error"], "validation_failed", "body: {body}");
    let actual: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(actual, expected);
}

/// Asserts the body is a conflict for `test_id`.
pub fn assert_conflict(body: &Value, test_id: &str) {
    assert_eq!(body["error"], "conflict", "body: {body}");
    assert_eq!(body["test_id"], test_id);
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains(test_id), "message: {message}");
}

/// Asserts the body is an internal error.
pub fn assert_internal_error(body: &Value) {
    assert_eq!(body["error"], "internal_error", "body: {body}");
    assert!(body["message"].is_string());
}

/// Returns the `test_id`s of a record array, in order.
pub fn test_ids(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("records array")
        .iter()
        .filter_map(|r| r["test_id"].as_str().map(String::from))
        .collect()
}
