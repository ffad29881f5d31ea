//! Validation tables.

use super::{FieldKind, FieldRule};

/// Rules for `POST /tests` payloads, in the order errors are reported.
pub const TEST_RECORD_RULES: &[FieldRule] = &[
    FieldRule::required("test_id", FieldKind::Text),
    FieldRule::required("clinic_id", FieldKind::Text),
    FieldRule::optional("patient_id", FieldKind::Text),
    FieldRule::optional("test_type", FieldKind::Text),
    FieldRule::required("result", FieldKind::Text),
    FieldRule::optional("result_value", FieldKind::Number),
    FieldRule::optional("unit", FieldKind::Text),
    FieldRule::optional("collected_at", FieldKind::Timestamp),
];
