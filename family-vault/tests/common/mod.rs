#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use family_vault::config::{MongoConfig, StorageConfig, VaultConfig};
use async_trait::async_trait;
use family_vault::services::{LocalStorage, MockRepository, Storage, StoredFile};
use family_vault::{build_router, AppState};
use http_body_util::BodyExt;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

pub const BOUNDARY: &str = "family-vault-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MockRepository>,
    pub storage_path: PathBuf,
}

pub fn test_config(storage_path: &str) -> VaultConfig {
    VaultConfig {
        common: CoreConfig {
            port: 0,
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: format!("family_vault_test_{}", Uuid::new_v4()),
        },
        storage: StorageConfig {
            local_path: storage_path.to_string(),
            max_upload_bytes: 1024 * 1024,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_storage(|local| Arc::new(local) as Arc<dyn Storage>).await
    }

    /// Spawns the app over a storage built from the temp `LocalStorage`.
    pub async fn spawn_with_storage<F>(wrap: F) -> Self
    where
        F: FnOnce(LocalStorage) -> Arc<dyn Storage>,
    {
        let storage_path = format!("target/test-storage-{}", Uuid::new_v4());
        let config = test_config(&storage_path);

        let storage = LocalStorage::new(&storage_path)
            .await
            .expect("Failed to create test storage");
        let repo = Arc::new(MockRepository::new());

        let state = AppState {
            config,
            documents: repo.clone(),
            profiles: repo.clone(),
            storage: wrap(storage),
        };

        TestApp {
            router: build_router(state),
            repo,
            storage_path: PathBuf::from(storage_path),
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_multipart(&self, uri: &str, form: MultipartBody) -> Response<Body> {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(form.finish()))
                .unwrap(),
        )
        .await
    }

    /// Uploads a document and returns the response body.
    pub async fn upload(
        &self,
        document_name: &str,
        uploader_name: &str,
        file_name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> serde_json::Value {
        let form = MultipartBody::new()
            .text("documentName", document_name)
            .text("uploaderName", uploader_name)
            .file("file", file_name, mime_type, data);

        let response = self.post_multipart("/upload", form).await;
        assert_eq!(response.status(), 200);
        body_json(response).await
    }

    pub fn stored_file(&self, key: &str) -> PathBuf {
        self.storage_path.join(key)
    }

    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(&self.storage_path)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.storage_path).await;
    }
}

/// Local storage whose deletes fail with a permission error.
pub struct UndeletableStorage(pub LocalStorage);

#[async_trait]
impl Storage for UndeletableStorage {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError> {
        self.0.upload(key, data).await
    }

    async fn open(&self, key: &str) -> Result<StoredFile, AppError> {
        self.0.open(key).await
    }

    async fn delete(&self, _key: &str) -> Result<(), AppError> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume").into())
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Failed to parse JSON")
}

/// Builds a `multipart/form-data` body delimited by [`BOUNDARY`].
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    /// Adds a file part; an empty `mime_type` omits the part's Content-Type.
    pub fn file(mut self, name: &str, file_name: &str, mime_type: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                BOUNDARY, name, file_name
            )
            .as_bytes(),
        );
        if !mime_type.is_empty() {
            self.buf
                .extend_from_slice(format!("Content-Type: {}\r\n", mime_type).as_bytes());
        }
        self.buf.extend_from_slice(b"\r\n");
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.buf
    }
}
