//! User service - sequences reads and writes across both stores.
//!
//! Writes always hit the document store first and the relational store
//! second. If a later write fails (the relational write, or the rest of a
//! document batch), the documents written in the same call are deleted again
//! before the error is returned.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use common::{AppError, AppResult, OptionExt};
use domain::{DualUser, DualUserList, UserBatch, UserRecord};

use crate::repository::{DocumentStore, RelationalStore, UserLookup};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const DUPLICATE_ENTRY: &str = "User ID or email";

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Write a validated record to both stores after checking neither holds
    /// its `user_id` or `email`.
    async fn create_user(&self, record: UserRecord) -> AppResult<UserRecord>;

    /// Write a validated batch to both stores, returning the record count
    async fn import_users(&self, batch: UserBatch) -> AppResult<usize>;

    /// Look a user up in both stores; fails only if both miss
    async fn get_user(&self, user_id: &str) -> AppResult<DualUser>;

    /// Everything in both stores
    async fn list_users(&self) -> AppResult<DualUserList>;

    /// Look a user up in the document store only
    async fn get_document_user(&self, user_id: &str) -> AppResult<UserRecord>;

    /// Everything in the document store
    async fn list_document_users(&self) -> AppResult<Vec<UserRecord>>;

    /// Look a user up in the relational store only
    async fn get_relational_user(&self, user_id: &str) -> AppResult<UserRecord>;

    /// Everything in the relational store
    async fn list_relational_users(&self) -> AppResult<Vec<UserRecord>>;
}

/// Concrete implementation of UserService over the two store adapters.
pub struct UserManager {
    documents: Arc<dyn DocumentStore>,
    relational: Arc<dyn RelationalStore>,
}

impl UserManager {
    /// Create new user service instance with both stores
    pub fn new(documents: Arc<dyn DocumentStore>, relational: Arc<dyn RelationalStore>) -> Self {
        Self {
            documents,
            relational,
        }
    }

    /// Fail with a duplicate-entry error if either store matches the lookup.
    async fn ensure_absent(&self, lookup: &UserLookup) -> AppResult<()> {
        if let Some(existing) = self.documents.find_one(lookup).await? {
            warn!(
                "Duplicate entry in document store (existing user_id {})",
                existing.record.user_id
            );
            return Err(AppError::conflict(DUPLICATE_ENTRY));
        }

        if let Some(existing) = self.relational.find_one(lookup).await? {
            warn!(
                "Duplicate entry in relational store (existing user_id {})",
                existing.record.user_id
            );
            return Err(AppError::conflict(DUPLICATE_ENTRY));
        }

        Ok(())
    }

    /// Undo document writes after a later write failed.
    async fn compensate(&self, ids: &[String], cause: &AppError) {
        warn!(
            "Write failed ({:?}); removing {} document(s) written in this request",
            cause,
            ids.len()
        );

        match self.documents.delete_many(ids).await {
            Ok(deleted) => info!("Compensation removed {} document(s)", deleted),
            Err(e) => error!(
                "Compensation failed, document ids {:?} remain without relational copies: {:?}",
                ids, e
            ),
        }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, record: UserRecord) -> AppResult<UserRecord> {
        self.ensure_absent(&UserLookup::conflicts_with(&record))
            .await?;

        let document_id = self.documents.insert_one(&record).await?;

        if let Err(e) = self.relational.insert(&record).await {
            self.compensate(&[document_id], &e).await;
            return Err(e);
        }

        info!("Created user {} in both stores", record.user_id);
        Ok(record)
    }

    async fn import_users(&self, batch: UserBatch) -> AppResult<usize> {
        let records = batch.into_records();
        self.ensure_absent(&UserLookup::conflicts_with_any(&records))
            .await?;

        let document_ids = match self.documents.insert_many(&records).await {
            Ok(ids) => ids,
            Err(e) => {
                if let AppError::PartialWrite { inserted, .. } = &e {
                    self.compensate(inserted, &e).await;
                }
                return Err(e);
            }
        };

        if let Err(e) = self.relational.insert_many(&records).await {
            self.compensate(&document_ids, &e).await;
            return Err(e);
        }

        info!("Imported {} users into both stores", records.len());
        Ok(records.len())
    }

    async fn get_user(&self, user_id: &str) -> AppResult<DualUser> {
        let lookup = UserLookup::by_user_id(user_id);
        let (mongodb_user, sqlite_user) = tokio::try_join!(
            self.documents.find_one(&lookup),
            self.relational.find_one(&lookup)
        )?;

        let user = DualUser {
            mongodb_user,
            sqlite_user,
        };
        if user.is_empty() {
            return Err(AppError::not_found("User not found"));
        }
        Ok(user)
    }

    async fn list_users(&self) -> AppResult<DualUserList> {
        let (mongodb_users, sqlite_users) =
            tokio::try_join!(self.documents.find_all(), self.relational.find_all())?;

        Ok(DualUserList {
            mongodb_users,
            sqlite_users,
        })
    }

    async fn get_document_user(&self, user_id: &str) -> AppResult<UserRecord> {
        self.documents
            .find_one(&UserLookup::by_user_id(user_id))
            .await?
            .map(|user| user.record)
            .ok_or_not_found("User not found in MongoDB")
    }

    async fn list_document_users(&self) -> AppResult<Vec<UserRecord>> {
        let users = self.documents.find_all().await?;
        Ok(users.into_iter().map(|user| user.record).collect())
    }

    async fn get_relational_user(&self, user_id: &str) -> AppResult<UserRecord> {
        self.relational
            .find_one(&UserLookup::by_user_id(user_id))
            .await?
            .map(|user| user.record)
            .ok_or_not_found("User not found in SQLite")
    }

    async fn list_relational_users(&self) -> AppResult<Vec<UserRecord>> {
        let users = self.relational.find_all().await?;
        Ok(users.into_iter().map(|user| user.record).collect())
    }
}
