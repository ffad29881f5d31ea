//! Axum extractors for labstore requests.
//!
//! Both extractors are infallible: they hand the handler a `Result` instead
//! of rejecting the request, so the handler can log the failure against the
//! request's correlation id before responding.
//!
//! - [`RecordPayload`] - The raw JSON object of a `POST /tests` body
//! - [`ClinicFilter`] - The `clinic_id` query parameter of `GET /tests`

mod clinic_filter;
mod record_payload;

pub use clinic_filter::ClinicFilter;
pub use record_payload::RecordPayload;
