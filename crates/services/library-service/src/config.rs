//! Library service configuration.

use std::env;

use common::{DatabaseConfig, StorageBackend};

/// Library service configuration.
#[derive(Debug, Clone, Default)]
pub struct LibraryConfig {
    /// Backend the repositories are built on
    pub storage: StorageBackend,
    /// Used only with `StorageBackend::Database` and by the CLI commands
    pub database: DatabaseConfig,
}

impl LibraryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let storage = match env::var("LIBRARY_STORAGE") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to {}", e, StorageBackend::Memory);
                StorageBackend::Memory
            }),
            Err(_) => StorageBackend::default(),
        };

        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: env::var("LIBRARY_DATABASE_URL")
                .or_else(|_| env::var("DATABASE_URL"))
                .unwrap_or(defaults.url),
            max_connections: env::var("LIBRARY_DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            min_connections: defaults.min_connections,
        };

        Self { storage, database }
    }
}
