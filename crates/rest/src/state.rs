//! Application state for the labstore REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the record store, configuration and correlation logger.

use std::sync::Arc;

use labstore_persistence::core::RecordStore;

use crate::config::ServerConfig;
use crate::correlation::CorrelationLogger;

/// Shared application state for the REST API.
///
/// The record store is opened once at process start and injected here; every
/// handler reaches it only through this state.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`RecordStore`])
///
/// # Example
///
/// ```rust,ignore
/// use labstore_rest::{AppState, ServerConfig};
/// use labstore_persistence::backends::sqlite::SqliteBackend;
/// use std::sync::Arc;
///
/// let backend = SqliteBackend::in_memory()?;
/// backend.init_schema()?;
/// let state = AppState::new(Arc::new(backend), ServerConfig::default());
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,

    /// Lifecycle logger.
    logger: CorrelationLogger,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
            logger: self.logger.clone(),
        }
    }
}

impl<S: RecordStore> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    ///
    /// Lifecycle entries go to `tracing`; use [`AppState::with_logger`] to
    /// send them elsewhere.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
            logger: CorrelationLogger::default(),
        }
    }

    /// Replaces the correlation logger.
    pub fn with_logger(mut self, logger: CorrelationLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the correlation logger.
    pub fn logger(&self) -> &CorrelationLogger {
        &self.logger
    }
}
