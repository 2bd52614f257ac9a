//! Document store adapter (MongoDB).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    error::{Error as MongoError, ErrorKind},
    Collection,
};
use serde::{Deserialize, Serialize};

use common::{AppError, AppResult};
use domain::{DocumentUser, UserRecord};

use super::lookup::UserLookup;
use crate::infra::DocumentDatabase;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Document store operations.
///
/// No transactions and no server-side uniqueness: callers check for
/// conflicts before writing.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// First document matching the lookup
    async fn find_one(&self, lookup: &UserLookup) -> AppResult<Option<DocumentUser>>;

    /// Every document in the collection
    async fn find_all(&self) -> AppResult<Vec<DocumentUser>>;

    /// Insert one record, returning the new document id
    async fn insert_one(&self, record: &UserRecord) -> AppResult<String>;

    /// Insert a batch, returning document ids in input order.
    ///
    /// A batch that stops part way fails with [`AppError::PartialWrite`]
    /// listing the ids that were written.
    async fn insert_many(&self, records: &[UserRecord]) -> AppResult<Vec<String>>;

    /// Remove documents by id, returning how many were deleted
    async fn delete_many(&self, ids: &[String]) -> AppResult<u64>;
}

/// BSON shape of a stored user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub age: i32,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserDocument {
    fn from(record: &UserRecord) -> Self {
        UserDocument {
            id: None,
            user_id: record.user_id.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
            age: record.age,
            created_at: record.created_at,
        }
    }
}

impl From<UserDocument> for DocumentUser {
    fn from(document: UserDocument) -> Self {
        DocumentUser {
            id: document.id.map(|id| id.to_hex()).unwrap_or_default(),
            record: UserRecord {
                user_id: document.user_id,
                name: document.name,
                email: document.email,
                age: document.age,
                created_at: document.created_at,
            },
        }
    }
}

/// Render a lookup as a MongoDB query filter.
pub fn to_filter(lookup: &UserLookup) -> Document {
    match lookup {
        UserLookup::UserId(user_id) => doc! { "user_id": user_id },
        UserLookup::UserIdOrEmail { user_id, email } => doc! {
            "$or": [ { "user_id": user_id }, { "email": email } ]
        },
        UserLookup::AnyOf { user_ids, emails } => doc! {
            "$or": [
                { "user_id": { "$in": user_ids } },
                { "email": { "$in": emails } },
            ]
        },
    }
}

fn object_id_hex(id: &Bson) -> AppResult<String> {
    id.as_object_id()
        .map(|oid| oid.to_hex())
        .ok_or_else(|| AppError::internal(format!("Unexpected document id: {}", id)))
}

/// Ids of an ordered batch write, in input order.
fn ordered_ids(inserted: HashMap<usize, Bson>) -> Vec<String> {
    let mut inserted: Vec<(usize, Bson)> = inserted.into_iter().collect();
    inserted.sort_by_key(|(index, _)| *index);
    inserted
        .iter()
        .filter_map(|(_, id)| id.as_object_id().map(|oid| oid.to_hex()))
        .collect()
}

/// Keep track of documents a failed batch insert left behind.
fn insert_many_failure(error: MongoError) -> AppError {
    let inserted = match error.kind.as_ref() {
        ErrorKind::InsertMany(failure) => ordered_ids(failure.inserted_ids.clone()),
        _ => Vec::new(),
    };

    if inserted.is_empty() {
        return AppError::from(error);
    }
    AppError::PartialWrite {
        inserted,
        message: error.to_string(),
    }
}

/// MongoDB-backed implementation of [`DocumentStore`].
pub struct MongoUserStore {
    users: Collection<UserDocument>,
}

impl MongoUserStore {
    /// Create new repository instance
    pub fn new(db: &DocumentDatabase) -> Self {
        Self {
            users: db.collection::<UserDocument>(),
        }
    }
}

#[async_trait]
impl DocumentStore for MongoUserStore {
    async fn find_one(&self, lookup: &UserLookup) -> AppResult<Option<DocumentUser>> {
        let found = self.users.find_one(to_filter(lookup)).await?;
        Ok(found.map(DocumentUser::from))
    }

    async fn find_all(&self) -> AppResult<Vec<DocumentUser>> {
        let cursor = self.users.find(doc! {}).await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(DocumentUser::from).collect())
    }

    async fn insert_one(&self, record: &UserRecord) -> AppResult<String> {
        let result = self.users.insert_one(UserDocument::from(record)).await?;
        object_id_hex(&result.inserted_id)
    }

    async fn insert_many(&self, records: &[UserRecord]) -> AppResult<Vec<String>> {
        let documents: Vec<UserDocument> = records.iter().map(UserDocument::from).collect();
        let result = self
            .users
            .insert_many(documents)
            .await
            .map_err(insert_many_failure)?;

        let ids = ordered_ids(result.inserted_ids);
        if ids.len() != records.len() {
            return Err(AppError::internal(format!(
                "Expected {} document ids, got {}",
                records.len(),
                ids.len()
            )));
        }
        Ok(ids)
    }

    async fn delete_many(&self, ids: &[String]) -> AppResult<u64> {
        let object_ids = ids
            .iter()
            .map(|id| {
                ObjectId::parse_str(id)
                    .map_err(|e| AppError::internal(format!("Invalid document id {}: {}", id, e)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let result = self
            .users
            .delete_many(doc! { "_id": { "$in": object_ids } })
            .await?;
        Ok(result.deleted_count)
    }
}
