//! Server configuration for the labstore REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LABSTORE_PORT` | 8080 | Server port |
//! | `LABSTORE_HOST` | 127.0.0.1 | Host to bind |
//! | `LABSTORE_LOG_LEVEL` | info | Log level |
//! | `LABSTORE_LOG_FORMAT` | json | Log output format (`json` or `text`) |
//! | `LABSTORE_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `LABSTORE_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `LABSTORE_ENABLE_CORS` | false | Enable CORS |
//! | `LABSTORE_CORS_ORIGINS` | * | Allowed origins |
//! | `DATABASE_URL` | records.db | SQLite database path, or `:memory:` |
//!
//! # Example
//!
//! ```rust
//! use labstore_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     database_url: ":memory:".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;

use clap::{Parser, ValueEnum};

/// Output format for diagnostic logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable text.
    Text,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Text => write!(f, "text"),
        }
    }
}

/// Server configuration for the labstore REST API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "labstore")]
#[command(about = "Medical test record ingestion and retrieval service")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "LABSTORE_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "LABSTORE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "LABSTORE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, env = "LABSTORE_LOG_FORMAT", value_enum, default_value = "json")]
    pub log_format: LogFormat,

    /// Maximum request body size in bytes.
    #[arg(long, env = "LABSTORE_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "LABSTORE_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "LABSTORE_ENABLE_CORS", default_value = "false")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "LABSTORE_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// SQLite database path, or `:memory:` for an in-memory store.
    #[arg(long, env = "DATABASE_URL", default_value = "records.db")]
    pub database_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            max_body_size: 1024 * 1024, // 1MB
            request_timeout: 30,
            enable_cors: false,
            cors_origins: "*".to_string(),
            database_url: "records.db".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        Self::try_parse_from(["labstore"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if the database is in memory.
    pub fn is_in_memory(&self) -> bool {
        self.database_url == ":memory:"
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.database_url.trim().is_empty() {
            errors.push("Database URL cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and an in-memory database.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            log_format: LogFormat::Text,
            max_body_size: 64 * 1024,
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            database_url: ":memory:".to_string(),
        }
    }
}
