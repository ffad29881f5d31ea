//! # labstore-rest - Medical Test Record HTTP API
//!
//! This crate provides the HTTP surface of the labstore service: ingestion
//! and retrieval of medical test records, with field validation, duplicate
//! rejection and per-request correlation logging.
//!
//! ## Features
//!
//! - **Declarative validation**: a rule table names every failing field in
//!   one response
//! - **Duplicate rejection**: a repeated `test_id` is answered with `409`,
//!   and the stored record is never overwritten
//! - **Correlation logging**: every request gets a UUID v4, logged at each
//!   lifecycle stage and returned in the `x-correlation-id` header
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use labstore_rest::{create_app_with_config, ServerConfig};
//! use labstore_persistence::backends::sqlite::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Create a storage backend
//!     let backend = SqliteBackend::open("records.db")?;
//!     backend.init_schema()?;
//!
//!     // Create the Axum application
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(backend, config);
//!
//!     // Start the server
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | create | POST | `/tests` |
//! | search | GET | `/tests?clinic_id=<id>` |
//! | health | GET | `/health` |
//! | liveness | GET | `/_liveness` |
//! | readiness | GET | `/_readiness` |
//!
//! ## Error Handling
//!
//! | HTTP Status | Body |
//! |-------------|------|
//! | 400 | `{"error": "validation_failed", "errors": [...]}` |
//! | 409 | `{"error": "conflict", "message": ..., "test_id": ...}` |
//! | 413 | `{"error": "payload_too_large", "message": ...}` |
//! | 500 | `{"error": "internal_error", "message": ...}` |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their JSON responses
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, configuration, logger)
//! - [`validation`] - Rule table and generic validator
//! - [`correlation`] - Correlation ids and lifecycle logging
//! - [`extractors`] - Axum extractors for payloads and query filters
//! - [`handlers`] - HTTP request handlers
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod correlation;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routing;
pub mod state;
pub mod validation;

// Re-export commonly used types
pub use config::{LogFormat, ServerConfig};
pub use correlation::{CORRELATION_ID_HEADER, CorrelationLogger};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
};
use labstore_persistence::core::RecordStore;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// This is a convenience function that creates the app with default settings.
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: RecordStore + Send + Sync + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use labstore_rest::{create_app_with_config, ServerConfig};
/// use labstore_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// backend.init_schema()?;
/// let config = ServerConfig {
///     port: 3000,
///     enable_cors: true,
///     ..Default::default()
/// };
/// let app = create_app_with_config(backend, config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: RecordStore + Send + Sync + 'static,
{
    create_app_with_state(AppState::new(Arc::new(storage), config))
}

/// Creates the Axum application from a prepared [`AppState`].
///
/// Use this to supply a custom [`CorrelationLogger`].
pub fn create_app_with_state<S>(state: AppState<S>) -> Router
where
    S: RecordStore + Send + Sync + 'static,
{
    let config = state.config().clone();

    info!(
        backend = state.storage().backend_name(),
        "Creating REST API server"
    );

    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = router.layer(DefaultBodyLimit::max(config.max_body_size));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([CORRELATION_ID_HEADER]);

    if config.cors_origins == "*" {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` overrides
/// `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
/// * `format` - JSON lines or human-readable text
pub fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "labstore={level},labstore_rest={level},labstore_persistence={level},tower_http=debug"
        ))
    });

    let fmt_layer = match format {
        LogFormat::Json => fmt::layer().json().flatten_event(true).boxed(),
        LogFormat::Text => fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();
}
