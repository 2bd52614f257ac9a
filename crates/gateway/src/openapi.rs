//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::user_handler::{CsvUploadForm, UploadResponse};
use domain::{DocumentUser, DualUser, DualUserList, RelationalUser, UserRecord};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::user_handler::create_user,
        crate::handlers::user_handler::upload_csv,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::list_users,
        crate::handlers::store_handler::get_mongodb_user,
        crate::handlers::store_handler::list_mongodb_users,
        crate::handlers::store_handler::get_sqlite_user,
        crate::handlers::store_handler::list_sqlite_users,
    ),
    components(
        schemas(
            UserRecord,
            DocumentUser,
            RelationalUser,
            DualUser,
            DualUserList,
            UploadResponse,
            CsvUploadForm,
        )
    ),
    tags(
        (name = "Users", description = "Dual-store user endpoints"),
        (name = "Stores", description = "Single-store read endpoints"),
    )
)]
pub struct ApiDoc;
