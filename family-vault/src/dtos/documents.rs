use crate::models::Document;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: String,
    pub document_name: String,
    pub uploader_name: String,
    pub file_path: String,
    pub file_type: String,
    pub upload_date: String,
    pub file_url: String,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            file_url: format!("/uploads/{}", urlencoding::encode(&doc.file_path)),
            id: doc.id,
            document_name: doc.document_name,
            uploader_name: doc.uploader_name,
            file_path: doc.file_path,
            file_type: doc.file_type,
            upload_date: doc.upload_date.to_rfc3339(),
        }
    }
}

/// Text fields of the upload form, checked once every part has been read.
#[derive(Debug, Default, Validate)]
pub struct UploadDocumentForm {
    #[validate(length(min = 1, message = "documentName is required"))]
    pub document_name: String,
    #[validate(length(min = 1, message = "uploaderName is required"))]
    pub uploader_name: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, message = "documentName is required"))]
    pub document_name: String,
    #[validate(length(min = 1, message = "uploaderName is required"))]
    pub uploader_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body returned by upload and edit.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentMutationResponse {
    pub message: String,
    pub document: DocumentResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_exposes_static_url() {
        let doc = Document::new(
            "Passport".to_string(),
            "Alice".to_string(),
            "1700000000000-passport.pdf".to_string(),
            "application/pdf".to_string(),
        );

        let response = DocumentResponse::from(doc);

        assert_eq!(response.file_url, "/uploads/1700000000000-passport.pdf");
        assert_eq!(response.file_path, "1700000000000-passport.pdf");
    }

    #[test]
    fn static_url_escapes_reserved_characters() {
        let doc = Document::new(
            "Notes".to_string(),
            "Alice".to_string(),
            "1-my note#1?.txt".to_string(),
            "text/plain".to_string(),
        );

        let response = DocumentResponse::from(doc);

        assert_eq!(response.file_url, "/uploads/1-my%20note%231%3F.txt");
        assert_eq!(response.file_path, "1-my note#1?.txt");
    }

    #[test]
    fn response_serializes_camel_case() {
        let doc = Document::new(
            "Deed".to_string(),
            "Bob".to_string(),
            "1-deed.pdf".to_string(),
            "application/pdf".to_string(),
        );

        let json = serde_json::to_value(DocumentResponse::from(doc)).unwrap();

        assert_eq!(json["documentName"], "Deed");
        assert_eq!(json["uploaderName"], "Bob");
        assert_eq!(json["fileType"], "application/pdf");
        assert!(json.get("uploadDate").is_some());
    }

    #[test]
    fn empty_names_fail_validation() {
        let form = UploadDocumentForm {
            document_name: String::new(),
            uploader_name: "Alice".to_string(),
        };
        let errors = form.validate().unwrap_err();

        assert!(errors.field_errors().contains_key("document_name"));
        assert!(!errors.field_errors().contains_key("uploader_name"));
    }
}
