use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use service_core::error::AppError;
use std::collections::HashMap;

/// A file part read fully into memory.
#[derive(Debug)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Every part of a multipart form: file parts in order, text parts by name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub files: Vec<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl MultipartForm {
    /// Takes the file sent under `name`, or else the first file part.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        if self.files.is_empty() {
            return None;
        }
        let index = self
            .files
            .iter()
            .position(|f| f.field_name == name)
            .unwrap_or(0);
        Some(self.files.remove(index))
    }

    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}

/// Reads all parts, rejecting any file larger than `max_file_bytes`.
pub async fn read_form(
    multipart: &mut Multipart,
    max_file_bytes: usize,
) -> Result<MultipartForm, AppError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = file_type(field.content_type(), &file_name);
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();

                if data.len() > max_file_bytes {
                    return Err(AppError::BadRequest(anyhow::anyhow!(
                        "File too large (max {} bytes)",
                        max_file_bytes
                    )));
                }

                form.files.push(UploadedFile {
                    field_name,
                    file_name,
                    content_type,
                    data,
                });
            }
            None => {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(field_name, value);
            }
        }
    }

    Ok(form)
}

/// MIME type of an upload: the part's declared type, else a guess from the
/// file extension.
pub fn file_type(declared: Option<&str>, file_name: &str) -> String {
    match declared.map(str::trim).filter(|t| !t.is_empty()) {
        Some(declared) => declared.to_string(),
        None => mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string(),
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::BadRequest(anyhow::anyhow!("Upload exceeds the request size limit"))
    } else {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart form: {}", e))
    }
}
