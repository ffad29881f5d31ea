//! REST API test harness.
//!
//! Provides infrastructure for testing the REST API endpoints.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use labstore_persistence::backends::sqlite::SqliteBackend;
use labstore_persistence::core::RecordStore;
use labstore_rest::correlation::{CorrelationLogger, MemorySink, Stage};
use labstore_rest::{AppState, ServerConfig, create_app_with_state};
use uuid::Uuid;

/// Test harness for REST API testing.
///
/// Wraps the full application (routes and middleware) over a real backend,
/// with lifecycle entries captured in memory.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_create() {
///     let harness = RestTestHarness::new_sqlite();
///     let response = harness.server.post("/tests").json(&positive_t1()).await;
///     response.assert_status_ok();
/// }
/// ```
pub struct RestTestHarness<S>
where
    S: RecordStore + Send + Sync + 'static,
{
    /// The test server instance.
    pub server: TestServer,

    /// The application router, for driving requests directly.
    pub router: Router,

    /// The storage backend.
    pub backend: Arc<S>,

    /// Captured lifecycle entries.
    pub sink: Arc<MemorySink>,

    /// Server configuration.
    pub config: ServerConfig,
}

impl RestTestHarness<SqliteBackend> {
    /// Creates a harness over an in-memory SQLite database.
    pub fn new_sqlite() -> Self {
        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        backend.init_schema().expect("Failed to init schema");
        Self::new(backend, ServerConfig::for_testing())
    }

    /// Creates a harness over a SQLite database file.
    pub fn new_sqlite_file(path: &Path) -> Self {
        let backend = SqliteBackend::open(path).expect("Failed to open SQLite backend");
        backend.init_schema().expect("Failed to init schema");
        Self::new(
            backend,
            ServerConfig {
                database_url: path.display().to_string(),
                ..ServerConfig::for_testing()
            },
        )
    }
}

impl<S> RestTestHarness<S>
where
    S: RecordStore + Send + Sync + 'static,
{
    /// Creates a new test harness with the given backend.
    pub fn new(backend: S, config: ServerConfig) -> Self {
        let backend = Arc::new(backend);
        let sink = Arc::new(MemorySink::new());

        let state = AppState::new(Arc::clone(&backend), config.clone())
            .with_logger(CorrelationLogger::new(sink.clone()));
        let router = create_app_with_state(state);
        let server = TestServer::new(router.clone()).expect("Failed to create test server");

        Self {
            server,
            router,
            backend,
            sink,
            config,
        }
    }

    /// Returns the stages logged for one request.
    pub fn stages(&self, correlation_id: Uuid) -> Vec<Stage> {
        self.sink.stages_for(correlation_id)
    }
}
