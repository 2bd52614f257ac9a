//! Unified error handling.
//!
//! Provides a single error type for the service and gateway layers that
//! converts directly into an Axum HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("{0}")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Client input
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    /// Catch-all for a write that failed part way; `context` names the operation.
    #[error("{context}: {message}")]
    Processing { context: String, message: String },

    // Store driver errors
    /// A batch write stopped part way; `inserted` holds the ids already written.
    #[error("Batch write incomplete after {} document(s): {message}", inserted.len())]
    PartialWrite {
        inserted: Vec<String>,
        message: String,
    },

    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "document")]
    #[error("Document store error")]
    DocumentStore(#[from] mongodb::error::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "DUPLICATE_ENTRY",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Processing { .. } => "PROCESSING_FAILED",
            AppError::PartialWrite { .. } => "PARTIAL_WRITE",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            #[cfg(feature = "document")]
            AppError::DocumentStore(_) => "DOCUMENT_STORE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) | AppError::Processing { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::Validation(_) => "Validation failed".to_string(),

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            #[cfg(feature = "document")]
            AppError::DocumentStore(e) => {
                tracing::error!("Document store error: {:?}", e);
                "A document store error occurred".to_string()
            }
            AppError::PartialWrite { inserted, message } => {
                tracing::error!("Partial write of {} document(s): {}", inserted.len(), message);
                "A document store error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }

    /// Per-item messages attached to the response (row or field violations)
    pub fn details(&self) -> Vec<String> {
        match self {
            AppError::Validation(messages) => messages.clone(),
            _ => Vec::new(),
        }
    }

    /// Rewrap anything that is not a client error as a processing failure.
    ///
    /// Write endpoints report store failures as `400` with the driver's
    /// message. The wrapped error is logged before its type is lost.
    pub fn into_processing_failure(self, context: &str) -> Self {
        match self {
            AppError::NotFound(_)
            | AppError::Conflict(_)
            | AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::Processing { .. } => self,
            other => {
                tracing::error!("{} ({}): {:?}", context, other.code(), other);
                let message = match &other {
                    #[cfg(feature = "database")]
                    AppError::Database(e) => e.to_string(),
                    #[cfg(feature = "document")]
                    AppError::DocumentStore(e) => e.to_string(),
                    AppError::PartialWrite { message, .. } => message.clone(),
                    AppError::Internal(msg) => msg.clone(),
                    _ => other.to_string(),
                };
                AppError::Processing {
                    context: context.to_string(),
                    message,
                }
            }
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(messages) => AppError::Validation(messages),
            DomainError::Malformed(msg) | DomainError::Empty(msg) => AppError::BadRequest(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, message: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, message: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(message.to_string()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(vec![msg.into()])
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::validation("x").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::internal("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_processing_failure_wraps_internal_only() {
        let wrapped = AppError::internal("disk full").into_processing_failure("Creation failed");
        assert_eq!(wrapped.status(), StatusCode::BAD_REQUEST);
        assert_eq!(wrapped.to_string(), "Creation failed: disk full");

        let conflict = AppError::conflict("User ID or email").into_processing_failure("Creation failed");
        assert!(matches!(conflict, AppError::Conflict(_)));
    }

    #[test]
    fn test_partial_write_is_server_error_until_rewrapped() {
        let partial = AppError::PartialWrite {
            inserted: vec!["65a000000000000000000001".to_string()],
            message: "E11000 duplicate key".to_string(),
        };
        assert_eq!(partial.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(partial.code(), "PARTIAL_WRITE");

        let wrapped = partial.into_processing_failure("Processing failed");
        assert_eq!(wrapped.to_string(), "Processing failed: E11000 duplicate key");
    }

    #[test]
    fn test_domain_error_conversion() {
        let err = AppError::from(DomainError::Validation(vec!["Row 1: bad".to_string()]));
        assert_eq!(err.details(), vec!["Row 1: bad".to_string()]);

        let err = AppError::from(DomainError::Empty("CSV contains no records".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let (status, body) = body_json(AppError::Validation(vec![
            "Row 2: age: must be between 0 and 120".to_string(),
        ]))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["details"][0],
            "Row 2: age: must be between 0 and 120"
        );

        let (_, body) = body_json(AppError::conflict("User ID or email")).await;
        assert_eq!(body["error"]["message"], "User ID or email already exists");
        assert!(body["error"].get("details").is_none());
    }
}
