//! RecordStore implementation for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::Error::FromSqlConversionFailure;
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, Row, TransactionBehavior, ffi, params};

use crate::core::RecordStore;
use crate::error::{BackendError, ResourceError, StorageError, StorageResult};
use crate::types::{NewTestRecord, TestRecord};

use super::SqliteBackend;

const SELECT_COLUMNS: &str = "test_id, clinic_id, patient_id, test_type, result, \
     result_value, unit, collected_at, created_at";

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

/// Returns true when the statement failed on the `test_id` key constraint.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE)
        }
        _ => false,
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_column<T, E>(
    idx: usize,
    value: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> rusqlite::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    parse(value).map_err(|e| FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<TestRecord> {
    let collected_at: Option<String> = row.get(7)?;
    let collected_at = collected_at
        .map(|s| parse_column(7, &s, DateTime::parse_from_rfc3339))
        .transpose()?;

    let created_at: String = row.get(8)?;
    let created_at =
        parse_column(8, &created_at, DateTime::parse_from_rfc3339)?.with_timezone(&Utc);

    let record = NewTestRecord {
        test_id: row.get(0)?,
        clinic_id: row.get(1)?,
        patient_id: row.get(2)?,
        test_type: row.get(3)?,
        result: row.get(4)?,
        result_value: row.get(5)?,
        unit: row.get(6)?,
        collected_at,
    };

    Ok(TestRecord::from_new(record, created_at))
}

/// Inserts a record inside an immediate write transaction.
///
/// The primary-key constraint decides conflicts; a failed insert leaves the
/// transaction to roll back on drop, so nothing is partially written.
fn insert_record(conn: &mut Connection, record: NewTestRecord) -> StorageResult<TestRecord> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    // Truncated so the returned value matches what a later read yields.
    let created_at = Utc::now().trunc_subsecs(6);

    let inserted = tx.execute(
        "INSERT INTO test_records
            (test_id, clinic_id, patient_id, test_type, result,
             result_value, unit, collected_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.test_id,
            record.clinic_id,
            record.patient_id,
            record.test_type,
            record.result,
            record.result_value,
            record.unit,
            record.collected_at.map(|t| t.to_rfc3339()),
            format_timestamp(created_at),
        ],
    );

    match inserted {
        Ok(1) => {}
        Ok(rows) => {
            return Err(internal_error(format!(
                "Insert of test record {} affected {} rows",
                record.test_id, rows
            )));
        }
        Err(e) if is_unique_violation(&e) => {
            return Err(StorageError::Resource(ResourceError::AlreadyExists {
                test_id: record.test_id,
            }));
        }
        Err(e) => return Err(e.into()),
    }

    tx.commit()?;

    Ok(TestRecord::from_new(record, created_at))
}

#[async_trait]
impl RecordStore for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn insert(&self, record: NewTestRecord) -> StorageResult<TestRecord> {
        let mut conn = self.get_connection()?;
        let stored = insert_record(&mut conn, record)?;

        tracing::debug!(
            test_id = %stored.test_id(),
            clinic_id = %stored.clinic_id(),
            "Inserted test record"
        );

        Ok(stored)
    }

    async fn query_by_clinic(&self, clinic_id: &str) -> StorageResult<Vec<TestRecord>> {
        let conn = self.get_connection()?;

        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM test_records WHERE clinic_id = ?1 ORDER BY created_at, test_id",
            SELECT_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![clinic_id], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    async fn read(&self, test_id: &str) -> StorageResult<Option<TestRecord>> {
        let conn = self.get_connection()?;

        let result = conn.query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM test_records WHERE test_id = ?1"),
            params![test_id],
            row_to_record,
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn health_check(&self) -> StorageResult<()> {
        let conn = self.get_connection().map_err(|_| {
            StorageError::Backend(BackendError::Unavailable {
                backend_name: "sqlite".to_string(),
                message: "Failed to get connection".to_string(),
            })
        })?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| internal_error(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}
