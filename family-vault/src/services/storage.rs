use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;
use futures::stream::{BoxStream, StreamExt};
use service_core::error::AppError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio_util::io::ReaderStream;

/// Bytes of a stored file, streamed from the backend.
pub struct StoredFile {
    pub size: u64,
    pub stream: BoxStream<'static, std::io::Result<Bytes>>,
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError>;
    async fn open(&self, key: &str) -> Result<StoredFile, AppError>;
    /// Removes the bytes under `key`. A key with no bytes is already deleted.
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Builds the storage key for an uploaded file: `<millis>-<file name>`.
pub fn storage_key(original_name: &str) -> String {
    format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_file_name(original_name)
    )
}

/// Keeps only the final path segment of a client-supplied file name.
fn sanitize_file_name(original_name: &str) -> String {
    let name = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match name {
        "" | "." | ".." => "unnamed".to_string(),
        _ => name.to_string(),
    }
}

pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Keys are flat file names; anything that could escape the base
    /// directory is rejected.
    fn resolve(&self, key: &str) -> Result<PathBuf, AppError> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid storage key: {}",
                key
            )));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError> {
        let path = self.resolve(key)?;
        fs::write(path, data).await?;
        Ok(())
    }

    async fn open(&self, key: &str) -> Result<StoredFile, AppError> {
        let path = self.resolve(key)?;
        let file = fs::File::open(path).await?;
        let size = file.metadata().await?.len();
        Ok(StoredFile {
            size,
            stream: ReaderStream::new(file).boxed(),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.resolve(key)?;
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(key = %key, "Delete requested for missing file");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use uuid::Uuid;

    async fn temp_storage() -> LocalStorage {
        LocalStorage::new(format!("target/test-storage-{}", Uuid::new_v4()))
            .await
            .unwrap()
    }

    async fn read_all(file: StoredFile) -> Vec<u8> {
        let chunks: Vec<Bytes> = file.stream.try_collect().await.unwrap();
        chunks.concat()
    }

    #[test]
    fn key_keeps_only_file_name() {
        let key = storage_key("../../etc/passwd");
        let (millis, name) = key.split_once('-').unwrap();

        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(name, "passwd");
        assert!(storage_key("C:\\scans\\deed.pdf").ends_with("-deed.pdf"));
        assert!(storage_key("").ends_with("-unnamed"));
    }

    #[tokio::test]
    async fn upload_open_delete_cycle() {
        let storage = temp_storage().await;

        storage.upload("1-note.txt", b"abc".to_vec()).await.unwrap();
        let file = storage.open("1-note.txt").await.unwrap();
        assert_eq!(file.size, 3);
        assert_eq!(read_all(file).await, b"abc");

        storage.delete("1-note.txt").await.unwrap();
        let err = storage.open("1-note.txt").await.err().unwrap();
        assert!(matches!(err, AppError::StorageError(_)));

        let _ = fs::remove_dir_all(storage.base_path()).await;
    }

    #[tokio::test]
    async fn deleting_missing_file_succeeds() {
        let storage = temp_storage().await;

        assert!(storage.delete("never-written.bin").await.is_ok());

        let _ = fs::remove_dir_all(storage.base_path()).await;
    }

    #[tokio::test]
    async fn rejects_keys_escaping_base_path() {
        let storage = temp_storage().await;

        let err = storage.upload("../escape.txt", vec![1]).await.err().unwrap();
        assert!(matches!(err, AppError::BadRequest(_)));

        let _ = fs::remove_dir_all(storage.base_path()).await;
    }
}
