use crate::dtos::{
    DocumentMutationResponse, DocumentResponse, MessageResponse, UpdateDocumentRequest,
    UploadDocumentForm,
};
use crate::handlers::multipart::read_form;
use crate::models::Document;
use crate::services::metrics::names;
use crate::services::storage_key;
use crate::startup::AppState;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Document not found"))
}

pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = read_form(&mut multipart, state.config.storage.max_upload_bytes).await?;

    let file = form
        .take_file("file")
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No file uploaded")))?;

    let fields = UploadDocumentForm {
        document_name: form.take_text("documentName").unwrap_or_default(),
        uploader_name: form.take_text("uploaderName").unwrap_or_default(),
    };
    fields.validate()?;

    let key = storage_key(&file.file_name);
    let size = file.data.len();
    let document = Document::new(
        fields.document_name,
        fields.uploader_name,
        key.clone(),
        file.content_type,
    );

    tracing::info!(
        document_id = %document.id,
        storage_key = %key,
        size = size,
        "Document upload started"
    );

    // 1. Store the bytes
    state.storage.upload(&key, file.data).await.map_err(|e| {
        tracing::error!("Failed to write file {} to storage: {}", key, e);
        e
    })?;

    // 2. Persist the record, removing the bytes again if that fails
    if let Err(e) = state.documents.insert(&document).await {
        tracing::error!(
            document_id = %document.id,
            storage_key = %key,
            "Failed to persist document, removing stored file: {}",
            e
        );
        if let Err(cleanup) = state.storage.delete(&key).await {
            tracing::error!(storage_key = %key, "Orphaned file left in storage: {}", cleanup);
        }
        return Err(e);
    }

    metrics::counter!(names::DOCUMENTS_UPLOADED).increment(1);
    metrics::histogram!(names::DOCUMENT_UPLOAD_BYTES).record(size as f64);

    tracing::info!(document_id = %document.id, "Document upload completed successfully");

    Ok(Json(DocumentMutationResponse {
        message: "Document uploaded successfully!".to_string(),
        document: DocumentResponse::from(document),
    }))
}

pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let documents = state.documents.list().await.map_err(|e| {
        tracing::error!("Failed to list documents: {}", e);
        e
    })?;

    Ok(Json(
        documents
            .into_iter()
            .map(DocumentResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Streams the stored bytes of a document.
pub async fn get_document_file(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let document = state
        .documents
        .find_by_id(&document_id)
        .await?
        .ok_or_else(not_found)?;

    let file = state.storage.open(&document.file_path).await.map_err(|e| {
        tracing::error!(
            document_id = %document_id,
            storage_key = %document.file_path,
            error = %e,
            "Failed to open stored file"
        );
        e
    })?;

    tracing::info!(
        document_id = %document_id,
        content_type = %document.file_type,
        size = file.size,
        "Serving document file"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, document.file_type.clone()),
            (header::CONTENT_LENGTH, file.size.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "inline; filename=\"{}\"",
                    document.file_path.replace('"', "")
                ),
            ),
        ],
        Body::from_stream(file.stream),
    ))
}

pub async fn update_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    payload: Result<Json<UpdateDocumentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let document = state
        .documents
        .update_names(&document_id, &request.document_name, &request.uploader_name)
        .await
        .map_err(|e| {
            tracing::error!(document_id = %document_id, "Failed to update document: {}", e);
            e
        })?
        .ok_or_else(not_found)?;

    tracing::info!(document_id = %document_id, "Document metadata updated");

    Ok(Json(DocumentMutationResponse {
        message: "Document updated successfully".to_string(),
        document: DocumentResponse::from(document),
    }))
}

/// Deletes the record, then its bytes. Once the record is gone the request
/// succeeds even if the bytes cannot be removed; the key is logged instead.
pub async fn delete_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let document = state
        .documents
        .delete(&document_id)
        .await?
        .ok_or_else(not_found)?;

    if let Err(e) = state.storage.delete(&document.file_path).await {
        tracing::error!(
            document_id = %document_id,
            storage_key = %document.file_path,
            "Record deleted but file removal failed: {}",
            e
        );
    }

    metrics::counter!(names::DOCUMENTS_DELETED).increment(1);
    tracing::info!(document_id = %document_id, "Document deleted");

    Ok(Json(MessageResponse {
        message: "Document deleted successfully".to_string(),
    }))
}
