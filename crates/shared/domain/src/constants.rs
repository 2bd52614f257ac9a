//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Record
// =============================================================================

/// Pattern every business identifier must match (`USR` + three digits)
pub const USER_ID_PATTERN: &str = r"^USR\d{3}$";

/// Youngest accepted age, also the stand-in when a CSV age cell is unreadable
pub const MIN_AGE: i32 = 0;

/// Field order used when reporting violations
pub const USER_FIELDS: &[&str] = &["user_id", "name", "email", "age", "created_at"];

// =============================================================================
// CSV Ingestion
// =============================================================================

/// Columns a CSV upload must provide, in canonical order
pub const CSV_REQUIRED_COLUMNS: &[&str] = &["user_id", "name", "email", "age"];

/// File extension accepted for bulk uploads
pub const CSV_FILE_EXTENSION: &str = ".csv";

/// Check whether a filename carries the accepted CSV extension
pub fn is_csv_filename(filename: &str) -> bool {
    filename.ends_with(CSV_FILE_EXTENSION)
}
