//! Clinic filter extractor.
//!
//! Extracts the `clinic_id` query parameter.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::validation::{FieldError, ValidationErrors};

/// Query parameters for `GET /tests`.
#[derive(Debug, Deserialize)]
struct ClinicQuery {
    clinic_id: Option<String>,
}

/// Axum extractor for the `clinic_id` filter.
///
/// Holds the trimmed clinic id, or the validation failure when it is
/// missing, blank or malformed.
///
/// # Example
///
/// ```rust,ignore
/// use labstore_rest::extractors::ClinicFilter;
///
/// async fn search_handler(ClinicFilter(clinic_id): ClinicFilter) {
///     if let Ok(id) = clinic_id {
///         println!("clinic {id}");
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ClinicFilter(pub Result<String, ValidationErrors>);

impl ClinicFilter {
    /// Parses the filter from a raw query string.
    pub fn from_query(query: Option<&str>) -> Self {
        let parsed = parse_query(query.unwrap_or_default());
        let clinic_id = match parsed {
            Ok(ClinicQuery {
                clinic_id: Some(id),
            }) if !id.trim().is_empty() => Ok(id.trim().to_string()),
            Ok(_) => Err(FieldError::Required { field: "clinic_id" }.into()),
            Err(()) => Err(FieldError::InvalidFormat { field: "clinic_id" }.into()),
        };
        ClinicFilter(clinic_id)
    }
}

fn parse_query(query: &str) -> Result<ClinicQuery, ()> {
    let uri = format!("/?{query}")
        .parse::<axum::http::Uri>()
        .map_err(|_| ())?;
    Query::<ClinicQuery>::try_from_uri(&uri)
        .map(|Query(q)| q)
        .map_err(|_| ())
}

impl<S> FromRequestParts<S> for ClinicFilter
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_query(parts.uri.query()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(filter: ClinicFilter) -> Vec<String> {
        filter.0.unwrap_err().messages()
    }

    #[test]
    fn test_clinic_id_present() {
        let ClinicFilter(id) = ClinicFilter::from_query(Some("clinic_id=c1"));
        assert_eq!(id.unwrap(), "c1");
    }

    #[test]
    fn test_clinic_id_is_trimmed_and_decoded() {
        let ClinicFilter(id) = ClinicFilter::from_query(Some("clinic_id=%20north%20wing%20"));
        assert_eq!(id.unwrap(), "north wing");
    }

    #[test]
    fn test_clinic_id_missing_or_blank() {
        assert_eq!(
            messages(ClinicFilter::from_query(None)),
            vec!["clinic_id is required"]
        );
        assert_eq!(
            messages(ClinicFilter::from_query(Some("other=1"))),
            vec!["clinic_id is required"]
        );
        assert_eq!(
            messages(ClinicFilter::from_query(Some("clinic_id=+++"))),
            vec!["clinic_id is required"]
        );
    }

    #[test]
    fn test_repeated_clinic_id_is_malformed() {
        assert_eq!(
            messages(ClinicFilter::from_query(Some("clinic_id=a&clinic_id=b"))),
            vec!["clinic_id invalid format"]
        );
    }
}
