//! User service configuration.

use std::env;

use common::{DocumentStoreConfig, RelationalStoreConfig, DEFAULT_MONGODB_DATABASE, DEFAULT_MONGODB_URL};

/// Store configuration for the user service.
#[derive(Debug, Clone, Default)]
pub struct UserServiceConfig {
    /// Document store (MongoDB) settings
    pub document: DocumentStoreConfig,
    /// Relational store (SQLite) settings; the location is fixed
    pub relational: RelationalStoreConfig,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            document: DocumentStoreConfig {
                url: env::var("MONGODB_URL").unwrap_or_else(|_| DEFAULT_MONGODB_URL.to_string()),
                database: env::var("MONGODB_DATABASE")
                    .unwrap_or_else(|_| DEFAULT_MONGODB_DATABASE.to_string()),
                ..DocumentStoreConfig::default()
            },
            relational: RelationalStoreConfig::default(),
        }
    }
}
