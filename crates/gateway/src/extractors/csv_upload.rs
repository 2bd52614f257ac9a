//! Multipart CSV upload extractor.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
};

use common::AppError;
use domain::is_csv_filename;

/// Multipart form field carrying the file
pub const UPLOAD_FIELD: &str = "file";

/// The `file` part of a multipart upload, checked to be a named `.csv` file.
#[derive(Debug)]
pub struct CsvUpload {
    pub filename: String,
    pub contents: Bytes,
}

#[async_trait]
impl<S> FromRequest<S> for CsvUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?
        {
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }

            let filename = field
                .file_name()
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .ok_or_else(|| AppError::bad_request("Invalid filename"))?;
            if !is_csv_filename(&filename) {
                return Err(AppError::bad_request("File must be a CSV"));
            }

            let contents = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(e.body_text()))?;

            return Ok(Self { filename, contents });
        }

        Err(AppError::bad_request("No file uploaded"))
    }
}
