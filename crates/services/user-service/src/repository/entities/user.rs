//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use domain::{RelationalUser, UserRecord};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    /// Surrogate key, assigned by the database
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Business identifier (indexed, not unique)
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to the store-tagged domain view
impl From<Model> for RelationalUser {
    fn from(model: Model) -> Self {
        RelationalUser {
            id: model.id,
            record: UserRecord {
                user_id: model.user_id,
                name: model.name,
                email: model.email,
                age: model.age,
                created_at: model.created_at,
            },
        }
    }
}

/// Build an insertable row; the surrogate key is left to the database
impl From<&UserRecord> for ActiveModel {
    fn from(record: &UserRecord) -> Self {
        ActiveModel {
            id: NotSet,
            user_id: Set(record.user_id.clone()),
            name: Set(record.name.clone()),
            email: Set(record.email.clone()),
            age: Set(record.age),
            created_at: Set(record.created_at),
        }
    }
}
