//! Test record types.
//!
//! This module defines [`TestRecord`], the persisted medical test record, and
//! [`NewTestRecord`], the validated form of a record before the store assigns
//! its `created_at` timestamp.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// A validated test record that has not yet been persisted.
///
/// Every field has already passed presence and format checks; the store only
/// adds the insertion timestamp.
///
/// # Examples
///
/// ```
/// use labstore_persistence::types::NewTestRecord;
///
/// let record = NewTestRecord::new("t1", "c1", "positive")
///     .with_patient_id("p-42")
///     .with_result_value(7.4);
///
/// assert_eq!(record.test_id, "t1");
/// assert_eq!(record.patient_id.as_deref(), Some("p-42"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewTestRecord {
    /// Client-supplied unique identifier.
    pub test_id: String,
    /// Owning clinic.
    pub clinic_id: String,
    /// Reported result (e.g. "positive").
    pub result: String,
    /// Patient reference.
    pub patient_id: Option<String>,
    /// Kind of test performed.
    pub test_type: Option<String>,
    /// Numeric measurement, when the result is quantitative.
    pub result_value: Option<f64>,
    /// Unit of `result_value`.
    pub unit: Option<String>,
    /// When the sample was collected.
    pub collected_at: Option<DateTime<FixedOffset>>,
}

impl NewTestRecord {
    /// Creates a record with only the required fields set.
    pub fn new(
        test_id: impl Into<String>,
        clinic_id: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            clinic_id: clinic_id.into(),
            result: result.into(),
            patient_id: None,
            test_type: None,
            result_value: None,
            unit: None,
            collected_at: None,
        }
    }

    /// Sets the patient reference.
    pub fn with_patient_id(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    /// Sets the test type.
    pub fn with_test_type(mut self, test_type: impl Into<String>) -> Self {
        self.test_type = Some(test_type.into());
        self
    }

    /// Sets the numeric result value.
    pub fn with_result_value(mut self, value: f64) -> Self {
        self.result_value = Some(value);
        self
    }

    /// Sets the unit of the numeric result.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Sets the collection timestamp.
    pub fn with_collected_at(mut self, collected_at: DateTime<FixedOffset>) -> Self {
        self.collected_at = Some(collected_at);
        self
    }
}

/// A persisted medical test record.
///
/// `TestRecord` is immutable once stored: the store never updates or deletes
/// it. `created_at` reflects the moment the insert committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    test_id: String,
    clinic_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    test_type: Option<String>,
    result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collected_at: Option<DateTime<FixedOffset>>,
    created_at: DateTime<Utc>,
}

impl TestRecord {
    /// Creates a stored record from its validated form and the commit time.
    pub fn from_new(record: NewTestRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            test_id: record.test_id,
            clinic_id: record.clinic_id,
            patient_id: record.patient_id,
            test_type: record.test_type,
            result: record.result,
            result_value: record.result_value,
            unit: record.unit,
            collected_at: record.collected_at,
            created_at,
        }
    }

    /// Returns the unique test identifier.
    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    /// Returns the owning clinic.
    pub fn clinic_id(&self) -> &str {
        &self.clinic_id
    }

    /// Returns the patient reference, if any.
    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    /// Returns the test type, if any.
    pub fn test_type(&self) -> Option<&str> {
        self.test_type.as_deref()
    }

    /// Returns the reported result.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Returns the numeric result value, if any.
    pub fn result_value(&self) -> Option<f64> {
        self.result_value
    }

    /// Returns the unit of the numeric result, if any.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Returns when the sample was collected, if known.
    pub fn collected_at(&self) -> Option<DateTime<FixedOffset>> {
        self.collected_at
    }

    /// Returns when the record was committed to the store.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
