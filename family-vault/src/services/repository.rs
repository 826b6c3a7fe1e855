use crate::models::{Document, Profile};
use async_trait::async_trait;
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn insert(&self, document: &Document) -> Result<(), AppError>;
    /// All documents in storage order.
    async fn list(&self) -> Result<Vec<Document>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, AppError>;
    /// Sets the two name fields and returns the updated record.
    async fn update_names(
        &self,
        id: &str,
        document_name: &str,
        uploader_name: &str,
    ) -> Result<Option<Document>, AppError>;
    /// Removes the record and returns what was removed.
    async fn delete(&self, id: &str) -> Result<Option<Document>, AppError>;
    async fn health_check(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get(&self) -> Result<Option<Profile>, AppError>;
    /// Inserts or replaces the household profile.
    async fn save(&self, profile: &Profile) -> Result<(), AppError>;
}

/// In-memory repository for tests. `set_fail_writes(true)` makes every
/// write return a database error, `set_fail_reads(true)` every read and the
/// health check.
pub struct MockRepository {
    pub documents: Mutex<Vec<Document>>,
    pub profile: Mutex<Option<Profile>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRepository {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            profile: Mutex::new(None),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_readable(&self) -> Result<(), AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "mock repository rejected the read"
            )));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "mock repository rejected the write"
            )));
        }
        Ok(())
    }

    fn lock_documents(&self) -> Result<std::sync::MutexGuard<'_, Vec<Document>>, AppError> {
        self.documents
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Mock documents mutex poisoned: {}", e)))
    }

    fn lock_profile(&self) -> Result<std::sync::MutexGuard<'_, Option<Profile>>, AppError> {
        self.profile
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Mock profile mutex poisoned: {}", e)))
    }
}

#[async_trait]
impl DocumentRepository for MockRepository {
    async fn insert(&self, document: &Document) -> Result<(), AppError> {
        self.check_writable()?;
        self.lock_documents()?.push(document.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Document>, AppError> {
        self.check_readable()?;
        Ok(self.lock_documents()?.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, AppError> {
        self.check_readable()?;
        Ok(self.lock_documents()?.iter().find(|d| d.id == id).cloned())
    }

    async fn update_names(
        &self,
        id: &str,
        document_name: &str,
        uploader_name: &str,
    ) -> Result<Option<Document>, AppError> {
        self.check_writable()?;
        let mut documents = self.lock_documents()?;
        Ok(documents.iter_mut().find(|d| d.id == id).map(|doc| {
            doc.document_name = document_name.to_string();
            doc.uploader_name = uploader_name.to_string();
            doc.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<Option<Document>, AppError> {
        self.check_writable()?;
        let mut documents = self.lock_documents()?;
        Ok(documents
            .iter()
            .position(|d| d.id == id)
            .map(|index| documents.remove(index)))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.check_readable()
    }
}

#[async_trait]
impl ProfileRepository for MockRepository {
    async fn get(&self) -> Result<Option<Profile>, AppError> {
        self.check_readable()?;
        Ok(self.lock_profile()?.clone())
    }

    async fn save(&self, profile: &Profile) -> Result<(), AppError> {
        self.check_writable()?;
        *self.lock_profile()? = Some(profile.clone());
        Ok(())
    }
}
