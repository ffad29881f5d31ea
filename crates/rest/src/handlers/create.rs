//! Create handler.
//!
//! Implements `POST /tests`: validate the payload, insert it, and report
//! each step to the correlation logger.
//!
//! ```text
//! received ─┬─ validation_failed                      → 400
//!           └─ validated ─ persist_attempt ─┬─ committed   → 200
//!                                           ├─ conflict    → 409
//!                                           └─ rolled_back → 500
//! ```

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use labstore_persistence::core::RecordStore;
use serde_json::{Map, Value};
use tracing::debug;

use crate::correlation::{LogDetails, RequestContext, RequestKind, Stage};
use crate::error::{RestError, RestResult};
use crate::extractors::RecordPayload;
use crate::handlers::correlated_response;
use crate::state::AppState;
use crate::validation::validate_test_record;

/// Handler for record creation.
///
/// # HTTP Request
///
/// `POST /tests`
///
/// # Response
///
/// - `200 OK` - The stored record, including its `created_at`
/// - `400 Bad Request` - Every failing field is named
/// - `409 Conflict` - A record with this `test_id` already exists
/// - `413 Payload Too Large` - Body exceeds the configured limit
/// - `500 Internal Server Error` - Storage failed; nothing was written
///
/// Every response carries an `x-correlation-id` header.
///
/// # Example
///
/// ```http
/// POST /tests HTTP/1.1
/// Content-Type: application/json
///
/// {"test_id": "t1", "clinic_id": "c1", "result": "positive"}
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    RecordPayload(payload): RecordPayload,
) -> Response
where
    S: RecordStore + Send + Sync,
{
    let ctx = state.logger().begin(RequestKind::CreateTest);
    state.logger().log(&ctx, Stage::Received, LogDetails::new());

    let outcome = create_record(&state, &ctx, payload).await;
    correlated_response(&ctx, outcome)
}

async fn create_record<S>(
    state: &AppState<S>,
    ctx: &RequestContext,
    payload: RestResult<Map<String, Value>>,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    let logger = state.logger();

    let validated = match payload {
        Ok(fields) => validate_test_record(&fields).map_err(RestError::from),
        Err(err) => Err(err),
    };
    let record = match validated {
        Ok(record) => record,
        Err(err) => {
            let details = match &err {
                RestError::ValidationFailed { errors } => {
                    LogDetails::new().with_errors(errors.clone())
                }
                other => LogDetails::new().with_error(other.to_string()),
            };
            logger.log(ctx, Stage::ValidationFailed, details);
            return Err(err);
        }
    };

    let test_id = record.test_id.clone();
    let clinic_id = record.clinic_id.clone();
    let details = || {
        LogDetails::new()
            .with_test_id(test_id.as_str())
            .with_clinic_id(clinic_id.as_str())
    };

    logger.log(ctx, Stage::Validated, details());
    logger.log(ctx, Stage::PersistAttempt, details());

    match state.storage().insert(record).await {
        Ok(stored) => {
            logger.log(
                ctx,
                Stage::Committed,
                details().with_created_at(stored.created_at()),
            );
            debug!(test_id = %stored.test_id(), "Test record created");
            Ok((StatusCode::OK, Json(stored)).into_response())
        }
        Err(err) if err.is_conflict() => {
            logger.log(ctx, Stage::Conflict, details());
            Err(err.into())
        }
        Err(err) => {
            logger.log(
                ctx,
                Stage::RolledBack,
                details().with_error(err.to_string()),
            );
            Err(err.into())
        }
    }
}
