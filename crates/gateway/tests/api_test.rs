//! Integration tests for API endpoints.
//!
//! The router runs against an in-process document store and an in-memory
//! SQLite database, so no external services are needed.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{AppError, RelationalStoreConfig};
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;
use user_service_lib::infra::Database;
use user_service_lib::repository::{InMemoryDocumentStore, RelationalStore, SqlUserStore};
use user_service_lib::service::{MockStoreProbe, MockUserService, UserManager};

const BOUNDARY: &str = "X-USER-UPLOAD-BOUNDARY";
const CSV_HEADER: &str = "user_id,name,email,age\n";

// =============================================================================
// Test Helpers
// =============================================================================

struct TestApp {
    router: Router,
    documents: Arc<InMemoryDocumentStore>,
    relational: Arc<SqlUserStore>,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::connect(&RelationalStoreConfig::in_memory())
            .await
            .expect("in-memory sqlite should open");
        let documents = Arc::new(InMemoryDocumentStore::new());
        let relational = Arc::new(SqlUserStore::new(db.get_connection()));

        let service = Arc::new(UserManager::new(documents.clone(), relational.clone()));
        let state = AppState::new(service, Arc::new(MockStoreProbe::new()));

        Self {
            router: create_router(state),
            documents,
            relational,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(self.router.clone(), request).await
    }

    async fn relational_count(&self) -> usize {
        self.relational.find_all().await.unwrap().len()
    }
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload(field: &str, filename: &str, contents: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{contents}\r\n--{b}--\r\n",
        b = BOUNDARY,
        field = field,
        filename = filename,
        contents = contents,
    );
    Request::builder()
        .method(Method::POST)
        .uri("/api/upload/csv")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn user_json(user_id: &str, email: &str) -> String {
    json!({ "user_id": user_id, "name": "John Doe", "email": email, "age": 30 }).to_string()
}

fn csv_rows(count: usize) -> String {
    (1..=count)
        .map(|i| format!("USR{:03},Row Person,row{}@example.com,{}\n", i, i, 20 + i))
        .collect()
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_user_lands_in_both_stores() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(post_json("/api/user", &user_json("USR001", "john.doe@example.com")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "USR001");
    assert_eq!(body["age"], 30);

    let (status, body) = app.send(get("/api/mongodb/user/USR001")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "john.doe@example.com");

    let (status, body) = app.send(get("/api/sqlite/user/USR001")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "John Doe");

    let (status, body) = app.send(get("/api/user/USR001")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mongodb_user"]["user_id"], "USR001");
    assert_eq!(body["sqlite_user"]["user_id"], "USR001");
    assert!(body["sqlite_user"]["id"].is_number());
}

#[tokio::test]
async fn test_duplicate_create_is_conflict() {
    let app = TestApp::new().await;
    app.send(post_json("/api/user", &user_json("USR001", "john.doe@example.com")))
        .await;

    let (status, body) = app
        .send(post_json("/api/user", &user_json("USR002", "john.doe@example.com")))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE_ENTRY");
    assert_eq!(body["error"]["message"], "User ID or email already exists");
    assert_eq!(app.documents.len(), 1);
    assert_eq!(app.relational_count().await, 1);
}

#[tokio::test]
async fn test_invalid_fields_report_every_violation() {
    let app = TestApp::new().await;
    let payload = json!({ "user_id": "USR1", "name": "John Doe", "email": "john@example.com", "age": 121 });

    let (status, body) = app.send(post_json("/api/user", &payload.to_string())).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let details = body["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert!(details[0].as_str().unwrap().starts_with("user_id:"));
    assert!(details[1].as_str().unwrap().starts_with("age:"));
    assert!(app.documents.is_empty());
}

#[tokio::test]
async fn test_email_without_dotted_domain_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(post_json("/api/user", &user_json("USR001", "john@localhost")))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0], "email: must be a valid email address");
    assert!(app.documents.is_empty());
}

#[tokio::test]
async fn test_missing_field_is_validation_error() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(post_json(
            "/api/user",
            r#"{"user_id":"USR001","name":"John Doe","age":30}"#,
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;

    let (status, body) = app.send(post_json("/api/user", "{\"user_id\": ")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_store_failure_on_create_is_processing_failure() {
    let mut service = MockUserService::new();
    service
        .expect_create_user()
        .returning(|_| Err(AppError::internal("database is locked")));
    let router = create_router(AppState::new(
        Arc::new(service),
        Arc::new(MockStoreProbe::new()),
    ));

    let (status, body) = send(
        router,
        post_json("/api/user", &user_json("USR001", "john@example.com")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "PROCESSING_FAILED");
    assert_eq!(
        body["error"]["message"],
        "Creation failed: database is locked"
    );
}

// =============================================================================
// CSV Upload
// =============================================================================

#[tokio::test]
async fn test_upload_writes_all_rows() {
    let app = TestApp::new().await;
    let contents = format!("{}{}", CSV_HEADER, csv_rows(10));

    let (status, body) = app.send(upload("file", "users.csv", &contents)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed_count"], 10);
    assert_eq!(body["message"], "Successfully processed 10 records");

    let (_, users) = app.send(get("/api/users")).await;
    assert_eq!(users["mongodb_users"].as_array().unwrap().len(), 10);
    assert_eq!(users["sqlite_users"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_upload_with_bad_row_writes_nothing() {
    let app = TestApp::new().await;
    let contents = format!(
        "{}{}USR011,Old Timer,old@example.com,200\n",
        CSV_HEADER,
        csv_rows(10)
    );

    let (status, body) = app.send(upload("file", "users.csv", &contents)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let details = body["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert!(details[0].as_str().unwrap().starts_with("Row 11:"));
    assert!(app.documents.is_empty());
    assert_eq!(app.relational_count().await, 0);
}

#[tokio::test]
async fn test_upload_colliding_with_stored_user_is_conflict() {
    let app = TestApp::new().await;
    app.send(post_json("/api/user", &user_json("USR003", "someone@example.com")))
        .await;
    let contents = format!("{}{}", CSV_HEADER, csv_rows(5));

    let (status, _) = app.send(upload("file", "users.csv", &contents)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.documents.len(), 1);
    assert_eq!(app.relational_count().await, 1);
}

#[tokio::test]
async fn test_upload_rejects_wrong_extension() {
    let app = TestApp::new().await;
    let contents = format!("{}{}", CSV_HEADER, csv_rows(1));

    let (status, body) = app.send(upload("file", "users.txt", &contents)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "File must be a CSV");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(upload("attachment", "users.csv", CSV_HEADER))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_of_header_only_file() {
    let app = TestApp::new().await;

    let (status, body) = app.send(upload("file", "users.csv", CSV_HEADER)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "CSV contains no records");
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.send(get("/api/user/USR999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "User not found");

    let (status, body) = app.send(get("/api/mongodb/user/USR999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "User not found in MongoDB");

    let (status, body) = app.send(get("/api/sqlite/user/USR999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "User not found in SQLite");
}

#[tokio::test]
async fn test_empty_stores_list_as_empty_arrays() {
    let app = TestApp::new().await;

    let (status, body) = app.send(get("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "mongodb_users": [], "sqlite_users": [] }));

    let (status, body) = app.send(get("/api/sqlite/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_store_failure_on_read_is_internal_error() {
    let mut service = MockUserService::new();
    service
        .expect_list_document_users()
        .returning(|| Err(AppError::internal("connection refused")));
    let router = create_router(AppState::new(
        Arc::new(service),
        Arc::new(MockStoreProbe::new()),
    ));

    let (status, body) = send(router, get("/api/mongodb/users")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "An internal error occurred");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_each_store() {
    let mut probe = MockStoreProbe::new();
    probe.expect_ping_documents().returning(|| Ok(()));
    probe
        .expect_ping_relational()
        .returning(|| Err(AppError::internal("unable to open database file")));
    let router = create_router(AppState::new(Arc::new(MockUserService::new()), Arc::new(probe)));

    let (status, body) = send(router, get("/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["mongodb"]["status"], "healthy");
    assert_eq!(body["services"]["sqlite"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new().await;

    let (status, body) = app.send(get("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/upload/csv"].is_object());
    assert_eq!(
        body["components"]["schemas"]["UserRecord"]["properties"]["user_id"]["example"],
        "USR001"
    );
    assert_eq!(
        body["components"]["schemas"]["UploadResponse"]["properties"]["processed_count"]["example"],
        10
    );
}
