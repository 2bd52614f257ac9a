//! Relational store adapter (SeaORM over SQLite).

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use common::AppResult;
use domain::{RelationalUser, UserRecord};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::lookup::UserLookup;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Relational store operations.
///
/// Writes run inside a transaction that is committed before returning.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// First row (lowest surrogate key) matching the lookup
    async fn find_one(&self, lookup: &UserLookup) -> AppResult<Option<RelationalUser>>;

    /// Every row, ordered by surrogate key
    async fn find_all(&self) -> AppResult<Vec<RelationalUser>>;

    /// Insert one record and commit
    async fn insert(&self, record: &UserRecord) -> AppResult<RelationalUser>;

    /// Insert every record in one transaction, committed once
    async fn insert_many(&self, records: &[UserRecord]) -> AppResult<usize>;
}

/// Render a lookup as a SeaORM condition.
pub fn to_condition(lookup: &UserLookup) -> Condition {
    match lookup {
        UserLookup::UserId(user_id) => {
            Condition::all().add(user::Column::UserId.eq(user_id.as_str()))
        }
        UserLookup::UserIdOrEmail { user_id, email } => Condition::any()
            .add(user::Column::UserId.eq(user_id.as_str()))
            .add(user::Column::Email.eq(email.as_str())),
        UserLookup::AnyOf { user_ids, emails } => Condition::any()
            .add(user::Column::UserId.is_in(user_ids.iter().cloned()))
            .add(user::Column::Email.is_in(emails.iter().cloned())),
    }
}

/// SeaORM-backed implementation of [`RelationalStore`].
pub struct SqlUserStore {
    db: DatabaseConnection,
}

impl SqlUserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RelationalStore for SqlUserStore {
    async fn find_one(&self, lookup: &UserLookup) -> AppResult<Option<RelationalUser>> {
        let result = UserEntity::find()
            .filter(to_condition(lookup))
            .order_by_asc(user::Column::Id)
            .one(&self.db)
            .await?;

        Ok(result.map(RelationalUser::from))
    }

    async fn find_all(&self) -> AppResult<Vec<RelationalUser>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(RelationalUser::from).collect())
    }

    async fn insert(&self, record: &UserRecord) -> AppResult<RelationalUser> {
        let txn = self.db.begin().await?;
        // An early return drops `txn`, which rolls it back
        let model = ActiveModel::from(record).insert(&txn).await?;
        txn.commit().await?;

        Ok(RelationalUser::from(model))
    }

    async fn insert_many(&self, records: &[UserRecord]) -> AppResult<usize> {
        let txn = self.db.begin().await?;
        for record in records {
            ActiveModel::from(record).insert(&txn).await?;
        }
        txn.commit().await?;

        Ok(records.len())
    }
}
