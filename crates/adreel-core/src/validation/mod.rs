//! Validation modules

pub mod file;

pub use file::{normalize_mime_type, FileValidator, ALLOWED_MIME_TYPES};
