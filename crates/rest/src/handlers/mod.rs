//! HTTP request handlers.
//!
//! - [`create`] - Ingest a test record (`POST /tests`)
//! - [`search`] - List a clinic's test records (`GET /tests`)
//! - [`health`] - Health, liveness and readiness checks
//!
//! Record handlers open a [`RequestContext`] on entry, thread it through
//! every step, and stamp its correlation id on the response.

pub mod create;
pub mod health;
pub mod search;

// Re-export handlers for convenience
pub use create::create_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use search::search_handler;

use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};

use crate::correlation::{CORRELATION_ID_HEADER, RequestContext};
use crate::error::RestResult;

/// Converts a handler outcome into a response carrying the correlation id.
pub(crate) fn correlated_response(ctx: &RequestContext, outcome: RestResult<Response>) -> Response {
    let mut response = outcome.unwrap_or_else(IntoResponse::into_response);
    if let Ok(value) = HeaderValue::from_str(&ctx.correlation_id().to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}
