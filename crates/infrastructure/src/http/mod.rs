//! HTTP helpers that touch the local filesystem.

mod upload;

pub use upload::{UploadError, UploadFile, read_upload};
