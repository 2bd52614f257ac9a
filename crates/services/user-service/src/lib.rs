//! User Service Library
//!
//! Keeps user records in a document store (MongoDB) and a relational store
//! (SQLite) in step. The gateway embeds this crate directly.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use common::AppResult;

use crate::config::UserServiceConfig;
use crate::infra::{Database, DocumentDatabase};
use crate::repository::{MongoUserStore, SqlUserStore};
use crate::service::{StoreProbe, UserManager, UserService};

/// Open connections to both stores.
#[derive(Clone)]
pub struct Stores {
    documents: DocumentDatabase,
    relational: Database,
}

impl Stores {
    /// Connect to both stores and apply pending relational migrations.
    pub async fn connect(config: &UserServiceConfig) -> AppResult<Self> {
        let documents = DocumentDatabase::connect(&config.document).await?;
        let relational = Database::connect(&config.relational).await?;

        Ok(Self {
            documents,
            relational,
        })
    }

    /// Build the dual-write service over these connections.
    pub fn user_service(&self) -> Arc<dyn UserService> {
        let documents = Arc::new(MongoUserStore::new(&self.documents));
        let relational = Arc::new(SqlUserStore::new(self.relational.get_connection()));
        Arc::new(UserManager::new(documents, relational))
    }

    /// Release both connection pools.
    pub async fn close(self) {
        self.documents.close().await;
        if let Err(e) = self.relational.close().await {
            warn!("Failed to close relational store: {}", e);
        }
        info!("Store connections closed");
    }
}

#[async_trait]
impl StoreProbe for Stores {
    async fn ping_documents(&self) -> AppResult<()> {
        Ok(self.documents.ping().await?)
    }

    async fn ping_relational(&self) -> AppResult<()> {
        Ok(self.relational.ping().await?)
    }
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> AppResult<()> {
    let config = UserServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.relational).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    db.close().await?;
    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
