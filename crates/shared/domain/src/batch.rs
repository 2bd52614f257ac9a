//! Bulk ingestion of user records from CSV.
//!
//! Rows are validated independently and every failing row is reported,
//! tagged with its 1-based data row number (the header is not counted).
//! A single bad row rejects the whole batch.

use std::collections::HashMap;
use std::io::Read;

use chrono::Utc;

use crate::constants::{CSV_REQUIRED_COLUMNS, MIN_AGE};
use crate::error::{DomainError, DomainResult};
use crate::user::UserRecord;

/// Validated set of records ready to be written to both stores.
#[derive(Debug, Clone)]
pub struct UserBatch {
    records: Vec<UserRecord>,
}

impl UserBatch {
    /// Parse and validate CSV text.
    pub fn from_csv<R: Read>(input: R) -> DomainResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| DomainError::malformed(e.to_string()))?
            .clone();
        if headers.is_empty() {
            return Err(DomainError::Empty("CSV file is empty".to_string()));
        }
        let columns = ColumnIndex::locate(&headers)?;

        let mut records = Vec::new();
        let mut errors = Vec::new();
        let mut seen_ids: HashMap<String, usize> = HashMap::new();
        let mut seen_emails: HashMap<String, usize> = HashMap::new();

        for (index, row) in reader.records().enumerate() {
            let row_number = index + 1;
            let row = row.map_err(|e| DomainError::malformed(e.to_string()))?;

            let record = match columns.parse(&row) {
                Ok(record) => record,
                Err(messages) => {
                    errors.push(format!("Row {}: {}", row_number, messages.join("; ")));
                    continue;
                }
            };

            let mut duplicates = Vec::new();
            if let Some(first) = seen_ids.get(&record.user_id) {
                duplicates.push(format!("user_id {} duplicates row {}", record.user_id, first));
            }
            if let Some(first) = seen_emails.get(&record.email) {
                duplicates.push(format!("email {} duplicates row {}", record.email, first));
            }
            if !duplicates.is_empty() {
                errors.push(format!("Row {}: {}", row_number, duplicates.join("; ")));
                continue;
            }

            seen_ids.insert(record.user_id.clone(), row_number);
            seen_emails.insert(record.email.clone(), row_number);
            records.push(record);
        }

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }
        if records.is_empty() {
            return Err(DomainError::Empty("CSV contains no records".to_string()));
        }

        Ok(Self { records })
    }

    /// Parse and validate an uploaded file body, which must be UTF-8.
    pub fn from_csv_bytes(bytes: &[u8]) -> DomainResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DomainError::malformed(format!("file is not valid UTF-8: {}", e)))?;
        Self::from_csv(text.as_bytes())
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<UserRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Positions of the required columns within the header row.
struct ColumnIndex {
    user_id: usize,
    name: usize,
    email: usize,
    age: usize,
}

impl ColumnIndex {
    fn locate(headers: &csv::StringRecord) -> DomainResult<Self> {
        let position = |column: &str| headers.iter().position(|h| h == column);

        let missing: Vec<&str> = CSV_REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| position(column).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::validation(format!(
                "Missing required columns: {}",
                missing.join(", ")
            )));
        }

        // Every column was found above.
        Ok(Self {
            user_id: position("user_id").unwrap_or_default(),
            name: position("name").unwrap_or_default(),
            email: position("email").unwrap_or_default(),
            age: position("age").unwrap_or_default(),
        })
    }

    /// Build one record, collecting every problem with the row.
    fn parse(&self, row: &csv::StringRecord) -> Result<UserRecord, Vec<String>> {
        let cell = |index: usize| row.get(index).unwrap_or_default().to_string();

        let age_cell = cell(self.age);
        let age = age_cell.parse::<i32>();

        let record = UserRecord {
            user_id: cell(self.user_id),
            name: cell(self.name),
            email: cell(self.email),
            age: *age.as_ref().unwrap_or(&MIN_AGE),
            created_at: Utc::now(),
        };

        let mut messages = match record.check() {
            Ok(()) => Vec::new(),
            Err(e) => e.messages().to_vec(),
        };
        if age.is_err() {
            messages.push(format!("age: '{}' is not a valid integer", age_cell));
        }

        if messages.is_empty() {
            Ok(record)
        } else {
            Err(messages)
        }
    }
}
