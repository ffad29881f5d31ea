//! Core types for the persistence layer.
//!
//! - [`TestRecord`] - A persisted medical test record
//! - [`NewTestRecord`] - A validated record awaiting insertion

mod test_record;

pub use test_record::{NewTestRecord, TestRecord};
