//! Route configuration.
//!
//! Defines all routes for the labstore REST API.

use axum::{
    Router,
    routing::{get, post},
};
use labstore_persistence::core::RecordStore;

use crate::handlers;
use crate::state::AppState;

/// Creates all REST API routes.
///
/// # Routes
///
/// ## Records
/// - `POST /tests` - Ingest a test record
/// - `GET /tests?clinic_id=<id>` - List a clinic's records
///
/// ## Operational
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness check
/// - `GET /_readiness` - Readiness check
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: RecordStore + Send + Sync + 'static,
{
    Router::new()
        // Operational routes
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        // Record routes
        .route("/tests", get(handlers::search_handler::<S>))
        .route("/tests", post(handlers::create_handler::<S>))
        // State
        .with_state(state)
}
