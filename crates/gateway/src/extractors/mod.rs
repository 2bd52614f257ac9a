//! Request extractors.

mod csv_upload;
mod validated_json;

pub use csv_upload::{CsvUpload, UPLOAD_FIELD};
pub use validated_json::ValidatedJson;
