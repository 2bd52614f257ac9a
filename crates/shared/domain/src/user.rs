//! User record and its store-tagged views.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::constants::{USER_FIELDS, USER_ID_PATTERN};
use crate::error::{DomainError, DomainResult};

static USER_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(USER_ID_PATTERN).expect("user id pattern is a valid regex"));

/// Canonical user record, written to both stores.
///
/// Deserializing does not validate; call [`UserRecord::check`] (or the
/// `Validate` impl) before persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserRecord {
    /// Business identifier, `USR` followed by three digits
    #[validate(regex(path = *USER_ID_REGEX, message = "must match pattern USR followed by 3 digits"))]
    #[cfg_attr(feature = "openapi", schema(example = "USR001"))]
    pub user_id: String,
    /// Display name, letters and spaces only
    #[validate(
        length(min = 2, max = 50, message = "must be between 2 and 50 characters"),
        custom(function = "validate_name_characters")
    )]
    #[cfg_attr(feature = "openapi", schema(example = "John Doe"))]
    pub name: String,
    /// Email address
    #[validate(custom(function = "validate_email_address"))]
    #[cfg_attr(feature = "openapi", schema(example = "john.doe@example.com"))]
    pub email: String,
    /// Age in years
    #[validate(range(min = 0, max = 120, message = "must be between 0 and 120"))]
    #[cfg_attr(feature = "openapi", schema(example = 30))]
    pub age: i32,
    /// Creation timestamp, defaults to now when omitted
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Build and validate a record stamped with the current time.
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        age: i32,
    ) -> DomainResult<Self> {
        let record = Self {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
            age,
            created_at: Utc::now(),
        };
        record.check()?;
        Ok(record)
    }

    /// Validate every field, reporting all violations at once.
    pub fn check(&self) -> DomainResult<()> {
        self.validate()
            .map_err(|errors| DomainError::Validation(validation_messages(&errors)))
    }
}

/// Names accept letters (any script) and whitespace only.
fn validate_name_characters(name: &str) -> Result<(), ValidationError> {
    if name.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        return Ok(());
    }

    let mut error = ValidationError::new("name_characters");
    error.message = Some("must contain only letters and spaces".into());
    Err(error)
}

/// Email syntax plus a dotted domain (`user@host` alone is rejected).
fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    let dotted_domain = email
        .rsplit_once('@')
        .map(|(_, domain)| {
            let labels: Vec<&str> = domain.split('.').collect();
            labels.len() > 1 && labels.iter().all(|label| !label.is_empty())
        })
        .unwrap_or(false);

    if email.validate_email() && dotted_domain {
        return Ok(());
    }

    let mut error = ValidationError::new("email");
    error.message = Some("must be a valid email address".into());
    Err(error)
}

/// Flatten validator output into `field: message` strings in field order.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by_key(|(field, _)| {
        let name: &str = field.as_ref();
        USER_FIELDS
            .iter()
            .position(|known| *known == name)
            .unwrap_or(USER_FIELDS.len())
    });

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: failed {} check", field, e.code),
            })
        })
        .collect()
}

/// Record as read back from the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DocumentUser {
    /// Document identifier (hex ObjectId)
    pub id: String,
    #[serde(flatten)]
    pub record: UserRecord,
}

/// Record as read back from the relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RelationalUser {
    /// Surrogate primary key
    pub id: i32,
    #[serde(flatten)]
    pub record: UserRecord,
}

/// One business identifier looked up in both stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DualUser {
    pub mongodb_user: Option<DocumentUser>,
    pub sqlite_user: Option<RelationalUser>,
}

impl DualUser {
    /// True when neither store holds the record
    pub fn is_empty(&self) -> bool {
        self.mongodb_user.is_none() && self.sqlite_user.is_none()
    }
}

/// Full contents of both stores, side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DualUserList {
    pub mongodb_users: Vec<DocumentUser>,
    pub sqlite_users: Vec<RelationalUser>,
}
