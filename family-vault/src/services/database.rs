use crate::models::{Document, Profile, HOUSEHOLD_PROFILE_ID};
use crate::services::repository::{DocumentRepository, ProfileRepository};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReplaceOptions, ReturnDocument},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub fn documents(&self) -> Collection<Document> {
        self.db.collection("documents")
    }

    pub fn profiles(&self) -> Collection<Profile> {
        self.db.collection("profiles")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl DocumentRepository for MongoDb {
    async fn insert(&self, document: &Document) -> Result<(), AppError> {
        self.documents()
            .insert_one(document, None)
            .await
            .map_err(|e| {
                tracing::error!(document_id = %document.id, "Failed to insert document: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Document>, AppError> {
        let cursor = self.documents().find(None, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, AppError> {
        Ok(self.documents().find_one(doc! { "_id": id }, None).await?)
    }

    async fn update_names(
        &self,
        id: &str,
        document_name: &str,
        uploader_name: &str,
    ) -> Result<Option<Document>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.documents()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": {
                    "documentName": document_name,
                    "uploaderName": uploader_name,
                } },
                options,
            )
            .await
            .map_err(|e| {
                tracing::error!(document_id = %id, "Failed to update document: {}", e);
                AppError::from(e)
            })
    }

    async fn delete(&self, id: &str) -> Result<Option<Document>, AppError> {
        self.documents()
            .find_one_and_delete(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(document_id = %id, "Failed to delete document: {}", e);
                AppError::from(e)
            })
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MongoDb {
    async fn get(&self) -> Result<Option<Profile>, AppError> {
        Ok(self
            .profiles()
            .find_one(doc! { "_id": HOUSEHOLD_PROFILE_ID }, None)
            .await?)
    }

    async fn save(&self, profile: &Profile) -> Result<(), AppError> {
        let options = ReplaceOptions::builder().upsert(true).build();

        self.profiles()
            .replace_one(doc! { "_id": profile.id.as_str() }, profile, options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save household profile: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
