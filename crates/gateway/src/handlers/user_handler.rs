//! User handlers that span both stores.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use common::AppResult;
use domain::{DualUser, DualUserList, UserBatch, UserRecord};

use crate::extractors::{CsvUpload, ValidatedJson};
use crate::state::AppState;

/// Outcome of a bulk upload
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "Successfully processed 10 records")]
    pub message: String,
    #[schema(example = 10)]
    pub processed_count: usize,
}

/// Multipart form accepted by the upload endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CsvUploadForm {
    /// CSV file with `user_id,name,email,age` columns
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(create_user))
        .route("/user/:user_id", get(get_user))
        .route("/users", get(list_users))
        .route("/upload/csv", post(upload_csv))
}

/// Create a user in both stores
#[utoipa::path(
    post,
    path = "/api/user",
    tag = "Users",
    request_body = UserRecord,
    responses(
        (status = 200, description = "User created", body = UserRecord),
        (status = 400, description = "Malformed JSON or store failure"),
        (status = 409, description = "User ID or email already exists"),
        (status = 422, description = "Field validation failed")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(record): ValidatedJson<UserRecord>,
) -> AppResult<Json<UserRecord>> {
    let user = state
        .user_service
        .create_user(record)
        .await
        .map_err(|e| e.into_processing_failure("Creation failed"))?;

    Ok(Json(user))
}

/// Bulk-create users from a CSV upload
#[utoipa::path(
    post,
    path = "/api/upload/csv",
    tag = "Users",
    request_body(content = CsvUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "All rows written to both stores", body = UploadResponse),
        (status = 400, description = "Missing, misnamed, unreadable or empty file, or store failure"),
        (status = 409, description = "A row collides with a stored user"),
        (status = 422, description = "One or more rows failed validation")
    )
)]
pub async fn upload_csv(
    State(state): State<AppState>,
    upload: CsvUpload,
) -> AppResult<Json<UploadResponse>> {
    let batch = UserBatch::from_csv_bytes(&upload.contents)?;
    info!("Parsed {} records from {}", batch.len(), upload.filename);

    let processed_count = state
        .user_service
        .import_users(batch)
        .await
        .map_err(|e| e.into_processing_failure("Processing failed"))?;

    Ok(Json(UploadResponse {
        message: format!("Successfully processed {} records", processed_count),
        processed_count,
    }))
}

/// Look a user up in both stores
#[utoipa::path(
    get,
    path = "/api/user/{user_id}",
    tag = "Users",
    params(
        ("user_id" = String, Path, description = "Business identifier", example = "USR001")
    ),
    responses(
        (status = 200, description = "Per-store copies of the user", body = DualUser),
        (status = 404, description = "User not found in either store")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<DualUser>> {
    let user = state.user_service.get_user(&user_id).await?;
    Ok(Json(user))
}

/// List users from both stores
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Contents of both stores", body = DualUserList)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<DualUserList>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users))
}
