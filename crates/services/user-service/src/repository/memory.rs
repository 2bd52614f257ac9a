//! In-process document store for tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use common::{AppError, AppResult};
use domain::{DocumentUser, UserRecord};

use super::documents::DocumentStore;
use super::lookup::UserLookup;

/// [`DocumentStore`] held in a `Vec`, with ObjectId-shaped ids.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<Vec<DocumentUser>>,
    next_id: AtomicU64,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Vec<DocumentUser>>> {
        self.documents
            .lock()
            .map_err(|_| AppError::internal("document store lock poisoned"))
    }

    fn store(&self, documents: &mut Vec<DocumentUser>, record: &UserRecord) -> String {
        let id = format!("{:024x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        documents.push(DocumentUser {
            id: id.clone(),
            record: record.clone(),
        });
        id
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_one(&self, lookup: &UserLookup) -> AppResult<Option<DocumentUser>> {
        Ok(self
            .lock()?
            .iter()
            .find(|doc| lookup.matches(&doc.record))
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<DocumentUser>> {
        Ok(self.lock()?.clone())
    }

    async fn insert_one(&self, record: &UserRecord) -> AppResult<String> {
        let mut documents = self.lock()?;
        Ok(self.store(&mut documents, record))
    }

    async fn insert_many(&self, records: &[UserRecord]) -> AppResult<Vec<String>> {
        let mut documents = self.lock()?;
        Ok(records
            .iter()
            .map(|record| self.store(&mut documents, record))
            .collect())
    }

    async fn delete_many(&self, ids: &[String]) -> AppResult<u64> {
        let mut documents = self.lock()?;
        let before = documents.len();
        documents.retain(|doc| !ids.contains(&doc.id));
        Ok((before - documents.len()) as u64)
    }
}
