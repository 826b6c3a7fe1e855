pub mod documents;
pub mod profile;

pub use documents::{
    DocumentMutationResponse, DocumentResponse, MessageResponse, UpdateDocumentRequest,
    UploadDocumentForm,
};
pub use profile::{ProfileResponse, ProfileUpdateResponse};
