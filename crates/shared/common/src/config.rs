//! Shared configuration structures.

use serde::{Deserialize, Serialize};

/// Default document store endpoint
pub const DEFAULT_MONGODB_URL: &str = "mongodb://localhost:27017";

/// Default document store database name
pub const DEFAULT_MONGODB_DATABASE: &str = "user_db";

/// Collection holding user documents
pub const USERS_COLLECTION: &str = "users";

/// Relational store location (file next to the working directory, created on demand)
pub const SQLITE_URL: &str = "sqlite://./sql_app.db?mode=rwc";

/// Document store (MongoDB) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentStoreConfig {
    /// Connection string
    pub url: String,
    /// Database holding the users collection
    pub database: String,
    /// Collection name
    pub collection: String,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_MONGODB_URL.to_string(),
            database: DEFAULT_MONGODB_DATABASE.to_string(),
            collection: USERS_COLLECTION.to_string(),
        }
    }
}

/// Relational store (SQLite) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelationalStoreConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl RelationalStoreConfig {
    /// Private in-memory database, pinned to one connection so every query
    /// sees the same data.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        }
    }
}

impl Default for RelationalStoreConfig {
    fn default() -> Self {
        Self {
            url: SQLITE_URL.to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}
