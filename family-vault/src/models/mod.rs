pub mod document;
pub mod profile;

pub use document::Document;
pub use profile::{Profile, HOUSEHOLD_PROFILE_ID};
