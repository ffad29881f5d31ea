//! Search handler.
//!
//! Implements `GET /tests?clinic_id=<id>`.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use labstore_persistence::core::RecordStore;
use tracing::debug;

use crate::correlation::{LogDetails, RequestContext, RequestKind, Stage};
use crate::error::{RestError, RestResult};
use crate::extractors::ClinicFilter;
use crate::handlers::correlated_response;
use crate::state::AppState;
use crate::validation::ValidationErrors;

/// Handler for listing a clinic's records.
///
/// # HTTP Request
///
/// `GET /tests?clinic_id=<id>`
///
/// # Response
///
/// - `200 OK` - JSON array of records, oldest first; `[]` when none match
/// - `400 Bad Request` - `clinic_id` missing or blank
/// - `500 Internal Server Error` - Storage failed
///
/// Every response carries an `x-correlation-id` header.
pub async fn search_handler<S>(
    State(state): State<AppState<S>>,
    ClinicFilter(clinic_id): ClinicFilter,
) -> Response
where
    S: RecordStore + Send + Sync,
{
    let ctx = state.logger().begin(RequestKind::QueryTests);
    state.logger().log(&ctx, Stage::Received, LogDetails::new());

    let outcome = search_records(&state, &ctx, clinic_id).await;
    correlated_response(&ctx, outcome)
}

async fn search_records<S>(
    state: &AppState<S>,
    ctx: &RequestContext,
    clinic_id: Result<String, ValidationErrors>,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    let logger = state.logger();

    let clinic_id = match clinic_id {
        Ok(id) => id,
        Err(errors) => {
            logger.log(
                ctx,
                Stage::ValidationFailed,
                LogDetails::new().with_errors(errors.messages()),
            );
            return Err(RestError::from(errors));
        }
    };

    logger.log(
        ctx,
        Stage::Validated,
        LogDetails::new().with_clinic_id(clinic_id.as_str()),
    );

    match state.storage().query_by_clinic(&clinic_id).await {
        Ok(records) => {
            logger.log(
                ctx,
                Stage::Committed,
                LogDetails::new()
                    .with_clinic_id(clinic_id.as_str())
                    .with_count(records.len()),
            );
            debug!(clinic_id = %clinic_id, count = records.len(), "Test records listed");
            Ok((StatusCode::OK, Json(records)).into_response())
        }
        Err(err) => {
            logger.log(
                ctx,
                Stage::RolledBack,
                LogDetails::new()
                    .with_clinic_id(clinic_id.as_str())
                    .with_error(err.to_string()),
            );
            Err(err.into())
        }
    }
}
