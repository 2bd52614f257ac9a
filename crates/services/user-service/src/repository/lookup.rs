//! Store-neutral description of a user query.
//!
//! Each adapter renders a lookup into its own query language.

use domain::UserRecord;

/// Equality on `user_id`, optionally OR-ed with `email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    /// Exact match on the business identifier
    UserId(String),
    /// Either field matches
    UserIdOrEmail { user_id: String, email: String },
    /// Any identifier or any email from the sets matches
    AnyOf {
        user_ids: Vec<String>,
        emails: Vec<String>,
    },
}

impl UserLookup {
    pub fn by_user_id(user_id: impl Into<String>) -> Self {
        UserLookup::UserId(user_id.into())
    }

    /// Records that would collide with `record`
    pub fn conflicts_with(record: &UserRecord) -> Self {
        UserLookup::UserIdOrEmail {
            user_id: record.user_id.clone(),
            email: record.email.clone(),
        }
    }

    /// Records that would collide with any of `records`
    pub fn conflicts_with_any(records: &[UserRecord]) -> Self {
        UserLookup::AnyOf {
            user_ids: records.iter().map(|r| r.user_id.clone()).collect(),
            emails: records.iter().map(|r| r.email.clone()).collect(),
        }
    }

    /// Evaluate the lookup against an in-memory record.
    pub fn matches(&self, record: &UserRecord) -> bool {
        match self {
            UserLookup::UserId(user_id) => record.user_id == *user_id,
            UserLookup::UserIdOrEmail { user_id, email } => {
                record.user_id == *user_id || record.email == *email
            }
            UserLookup::AnyOf { user_ids, emails } => {
                user_ids.contains(&record.user_id) || emails.contains(&record.email)
            }
        }
    }
}
