//! Test fixtures for REST API testing.
//!
//! Provides record payloads for use in tests.

use serde_json::{Value, json};

/// Builder for `POST /tests` payloads.
#[derive(Debug, Clone)]
pub struct RecordFixture {
    body: serde_json::Map<String, Value>,
}

impl RecordFixture {
    /// A payload with only the required fields.
    pub fn new(test_id: &str, clinic_id: &str, result: &str) -> Self {
        let mut body = serde_json::Map::new();
        body.insert("test_id".into(), json!(test_id));
        body.insert("clinic_id".into(), json!(clinic_id));
        body.insert("result".into(), json!(result));
        Self { body }
    }

    /// A payload with every known field set.
    pub fn complete(test_id: &str, clinic_id: &str) -> Self {
        Self::new(test_id, clinic_id, "high")
            .with("patient_id", json!("p-100"))
            .with("test_type", json!("glucose"))
            .with("result_value", json!(7.4))
            .with("unit", json!("mmol/L"))
            .with("collected_at", json!("2024-03-01T08:30:00Z"))
    }

    /// Sets (or overrides) a field.
    pub fn with(mut self, field: &str, value: Value) -> Self {
        self.body.insert(field.to_string(), value);
        self
    }

    /// Removes a field.
    pub fn without(mut self, field: &str) -> Self {
        self.body.remove(field);
        self
    }

    /// Returns the JSON body.
    pub fn json(&self) -> Value {
        Value::Object(self.body.clone())
    }
}

/// The payload from the service's worked example.
pub fn positive_t1() -> Value {
    RecordFixture::new("t1", "c1", "positive").json()
}
