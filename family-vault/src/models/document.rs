use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One uploaded family file and the metadata describing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    pub document_name: String,
    pub uploader_name: String,
    /// Storage key of the bytes; never changes after upload.
    pub file_path: String,
    pub file_type: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub upload_date: DateTime<Utc>,
}

impl Document {
    pub fn new(
        document_name: String,
        uploader_name: String,
        file_path: String,
        file_type: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            document_name,
            uploader_name,
            file_path,
            file_type,
            upload_date: Utc::now(),
        }
    }
}
