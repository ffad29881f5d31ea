//! Health check endpoint handlers.
//!
//! Provides health, liveness and readiness endpoints for monitoring and load
//! balancers. Health checks are not correlation-logged.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use labstore_persistence::core::RecordStore;
use tracing::{debug, warn};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET /health`
///
/// # Response
///
/// - `200 OK` - Server is running
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: RecordStore + Send + Sync,
{
    debug!("Processing health check request");

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": state.storage().backend_name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(health_response)).into_response()
}

/// Handler for the liveness check.
///
/// # HTTP Request
///
/// `GET /_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness check.
///
/// Verifies the record store is reachable.
///
/// # HTTP Request
///
/// `GET /_readiness`
///
/// # Response
///
/// - `200 OK` - Storage reachable
/// - `503 Service Unavailable` - Storage check failed
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: RecordStore + Send + Sync,
{
    debug!("Processing readiness check request");

    let backend_name = state.storage().backend_name();

    match state.storage().health_check().await {
        Ok(()) => {
            let response = serde_json::json!({
                "status": "ready",
                "backend": backend_name,
                "checks": { "storage": "ok" }
            });
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => {
            warn!(error = %err, "Readiness check failed");
            let response = serde_json::json!({
                "status": "unavailable",
                "backend": backend_name,
                "checks": { "storage": "failed" }
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
        }
    }
}
