//! Record payload extractor.
//!
//! Buffers the request body and parses it as a JSON object.

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde_json::{Map, Value};

use crate::error::{RestError, RestResult};
use crate::validation::parse_body;

/// Axum extractor for a record payload.
///
/// Holds the parsed JSON object, or the error the handler should respond
/// with. Field validation is left to the handler.
///
/// # Example
///
/// ```rust,ignore
/// use labstore_rest::extractors::RecordPayload;
///
/// async fn create_handler(RecordPayload(payload): RecordPayload) {
///     match payload {
///         Ok(fields) => println!("{} fields", fields.len()),
///         Err(e) => println!("rejected: {e}"),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct RecordPayload(pub RestResult<Map<String, Value>>);

impl RecordPayload {
    /// Parses an already-buffered body.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        RecordPayload(parse_body(bytes).map_err(RestError::from))
    }
}

impl<S> FromRequest<S> for RecordPayload
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Bytes::from_request(req, state).await {
            Ok(bytes) => Ok(Self::from_bytes(&bytes)),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Ok(RecordPayload(Err(RestError::PayloadTooLarge {
                    message: e.body_text(),
                })))
            }
            // An unreadable body is treated like a malformed one.
            Err(_) => Ok(Self::from_bytes(&[])),
        }
    }
}
