//! Payload validation.
//!
//! Validation is driven by a declarative table of [`FieldRule`]s consumed by
//! the generic [`validate_fields`] routine. Every rule runs, so a single
//! response names every failing field, in table order.
//!
//! The test record table lives in [`rules`]; [`validate_test_record`] turns a
//! raw JSON object into a [`NewTestRecord`].

pub mod rules;

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use labstore_persistence::types::NewTestRecord;
use serde_json::{Map, Value};
use thiserror::Error;

pub use rules::TEST_RECORD_RULES;

/// The expected shape of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string.
    Text,
    /// A finite JSON number, or a string that parses as one.
    Number,
    /// An RFC 3339 timestamp string.
    Timestamp,
}

/// One row of a validation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// JSON field name.
    pub name: &'static str,
    /// Whether the field must be present and non-blank.
    pub required: bool,
    /// Expected value shape.
    pub kind: FieldKind,
}

impl FieldRule {
    /// A field that must be present.
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: true,
            kind,
        }
    }

    /// A field that may be absent, null or blank.
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: false,
            kind,
        }
    }

    /// Checks one value against this rule.
    ///
    /// Returns `Ok(None)` for an absent optional field.
    pub fn check(&self, value: Option<&Value>) -> Result<Option<FieldValue>, FieldError> {
        let value = match value {
            None | Some(Value::Null) => return self.absent(),
            Some(v) => v,
        };

        match (self.kind, value) {
            (_, Value::String(s)) if s.trim().is_empty() => self.absent(),
            (FieldKind::Text, Value::String(s)) => Ok(Some(FieldValue::Text(s.trim().to_string()))),
            (FieldKind::Number, Value::Number(n)) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| Some(FieldValue::Number(f)))
                .ok_or(self.invalid()),
            (FieldKind::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| Some(FieldValue::Number(f)))
                .ok_or(self.invalid()),
            (FieldKind::Timestamp, Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
                .map(|t| Some(FieldValue::Timestamp(t)))
                .map_err(|_| self.invalid()),
            _ => Err(self.invalid()),
        }
    }

    fn absent(&self) -> Result<Option<FieldValue>, FieldError> {
        if self.required {
            Err(FieldError::Required { field: self.name })
        } else {
            Ok(None)
        }
    }

    fn invalid(&self) -> FieldError {
        FieldError::InvalidFormat { field: self.name }
    }
}

/// A normalized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Trimmed text.
    Text(String),
    /// A finite number.
    Number(f64),
    /// A parsed timestamp, keeping its offset.
    Timestamp(DateTime<FixedOffset>),
}

/// A single field failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Missing, null or blank required field.
    #[error("{field} is required")]
    Required {
        /// Field name.
        field: &'static str,
    },
    /// Value of the wrong type or shape.
    #[error("{field} invalid format")]
    InvalidFormat {
        /// Field name.
        field: &'static str,
    },
}

impl FieldError {
    /// Returns the name of the failing field.
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Required { field } | FieldError::InvalidFormat { field } => field,
        }
    }
}

/// A non-empty, ordered list of field failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Returns the failures in rule order.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Returns the human-readable messages in rule order.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Field values that passed validation, keyed by field name.
#[derive(Debug, Default)]
pub struct ValidatedFields(HashMap<&'static str, FieldValue>);

impl ValidatedFields {
    /// Removes a text value.
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        match self.0.remove(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Removes a numeric value.
    pub fn take_number(&mut self, name: &str) -> Option<f64> {
        match self.0.remove(name) {
            Some(FieldValue::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Removes a timestamp value.
    pub fn take_timestamp(&mut self, name: &str) -> Option<DateTime<FixedOffset>> {
        match self.0.remove(name) {
            Some(FieldValue::Timestamp(t)) => Some(t),
            _ => None,
        }
    }

    fn take_required_text(&mut self, name: &'static str) -> Result<String, ValidationErrors> {
        self.take_text(name)
            .ok_or_else(|| FieldError::Required { field: name }.into())
    }
}

/// Runs every rule in `rules` against `fields`.
///
/// Fields not named by a rule are ignored.
pub fn validate_fields(
    rules: &[FieldRule],
    fields: &Map<String, Value>,
) -> Result<ValidatedFields, ValidationErrors> {
    let mut values = HashMap::new();
    let mut errors = Vec::new();

    for rule in rules {
        match rule.check(fields.get(rule.name)) {
            Ok(Some(value)) => {
                values.insert(rule.name, value);
            }
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(ValidatedFields(values))
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Validates a raw JSON object as a new test record.
pub fn validate_test_record(
    fields: &Map<String, Value>,
) -> Result<NewTestRecord, ValidationErrors> {
    let mut values = validate_fields(TEST_RECORD_RULES, fields)?;

    let mut record = NewTestRecord::new(
        values.take_required_text("test_id")?,
        values.take_required_text("clinic_id")?,
        values.take_required_text("result")?,
    );
    record.patient_id = values.take_text("patient_id");
    record.test_type = values.take_text("test_type");
    record.result_value = values.take_number("result_value");
    record.unit = values.take_text("unit");
    record.collected_at = values.take_timestamp("collected_at");

    Ok(record)
}

/// Parses a request body into a JSON object.
///
/// Anything other than a JSON object fails with `body invalid format`.
pub fn parse_body(bytes: &[u8]) -> Result<Map<String, Value>, ValidationErrors> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(FieldError::InvalidFormat { field: "body" }.into()),
    }
}
