//! Handlers that read a single store.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use common::AppResult;
use domain::UserRecord;

use crate::state::AppState;

/// Create per-store routes
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/mongodb/user/:user_id", get(get_mongodb_user))
        .route("/mongodb/users", get(list_mongodb_users))
        .route("/sqlite/user/:user_id", get(get_sqlite_user))
        .route("/sqlite/users", get(list_sqlite_users))
}

#[utoipa::path(
    get,
    path = "/api/mongodb/user/{user_id}",
    tag = "Stores",
    params(("user_id" = String, Path, description = "Business identifier")),
    responses(
        (status = 200, description = "User from the document store", body = UserRecord),
        (status = 404, description = "User not found in MongoDB")
    )
)]
pub async fn get_mongodb_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserRecord>> {
    Ok(Json(state.user_service.get_document_user(&user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/mongodb/users",
    tag = "Stores",
    responses((status = 200, description = "Every user in the document store", body = Vec<UserRecord>))
)]
pub async fn list_mongodb_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserRecord>>> {
    Ok(Json(state.user_service.list_document_users().await?))
}

#[utoipa::path(
    get,
    path = "/api/sqlite/user/{user_id}",
    tag = "Stores",
    params(("user_id" = String, Path, description = "Business identifier")),
    responses(
        (status = 200, description = "User from the relational store", body = UserRecord),
        (status = 404, description = "User not found in SQLite")
    )
)]
pub async fn get_sqlite_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserRecord>> {
    Ok(Json(state.user_service.get_relational_user(&user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/sqlite/users",
    tag = "Stores",
    responses((status = 200, description = "Every user in the relational store", body = Vec<UserRecord>))
)]
pub async fn list_sqlite_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserRecord>>> {
    Ok(Json(state.user_service.list_relational_users().await?))
}
