pub mod documents;
pub mod health;
pub mod multipart;
pub mod profile;

pub use documents::{
    delete_document, get_document_file, list_documents, update_document, upload_document,
};
pub use health::{health_check, metrics_endpoint, readiness_check, root};
pub use profile::{get_profile, update_profile};
