//! Error types for the labstore REST API.
//!
//! This module defines the errors a handler can end with, and their
//! conversion to JSON error responses.
//!
//! # Error Mapping
//!
//! | Error | HTTP Status | `error` tag |
//! |-------|-------------|-------------|
//! | ValidationFailed | 400 | validation_failed |
//! | Conflict | 409 | conflict |
//! | PayloadTooLarge | 413 | payload_too_large |
//! | InternalError | 500 | internal_error |
//!
//! Storage errors from the persistence layer map to `Conflict` when the
//! write collided with an existing `test_id` and to `InternalError`
//! otherwise. Internal error details are logged, never returned.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use labstore_persistence::error::{ResourceError, StorageError};
use serde_json::json;
use std::fmt;

use crate::validation::ValidationErrors;

/// Message returned to clients for any internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Input failed validation (HTTP 400).
    ValidationFailed {
        /// Messages, in rule order.
        errors: Vec<String>,
    },

    /// A record with this `test_id` already exists (HTTP 409).
    Conflict {
        /// The colliding `test_id`.
        test_id: String,
    },

    /// Request body exceeded the configured limit (HTTP 413).
    PayloadTooLarge {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            RestError::Conflict { .. } => StatusCode::CONFLICT,
            RestError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::ValidationFailed { errors } => {
                write!(f, "Validation failed: {}", errors.join(", "))
            }
            RestError::Conflict { test_id } => write!(f, "test_id {} already exists", test_id),
            RestError::PayloadTooLarge { message } => write!(f, "Payload too large: {}", message),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            RestError::ValidationFailed { errors } => json!({
                "error": "validation_failed",
                "errors": errors,
            }),
            RestError::Conflict { test_id } => json!({
                "error": "conflict",
                "message": self.to_string(),
                "test_id": test_id,
            }),
            RestError::PayloadTooLarge { message } => json!({
                "error": "payload_too_large",
                "message": message,
            }),
            RestError::InternalError { .. } => json!({
                "error": "internal_error",
                "message": INTERNAL_ERROR_MESSAGE,
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for RestError {
    fn from(err: ValidationErrors) -> Self {
        RestError::ValidationFailed {
            errors: err.messages(),
        }
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(ResourceError::AlreadyExists { test_id }) => {
                RestError::Conflict { test_id }
            }
            other => RestError::InternalError {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
