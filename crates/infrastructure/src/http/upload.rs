//! Reading local files for multipart uploads.

use std::path::Path;

/// Error type for reading an upload from disk.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// Failed to read file.
    #[error("Failed to read file: {message}")]
    FileReadError {
        /// Path and underlying I/O error.
        message: String,
    },
}

/// A file loaded into memory, ready to become a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent with the part.
    pub file_name: String,
    /// MIME type guessed from the extension, if any.
    pub mime: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Reads `path` and guesses its MIME type from the extension.
///
/// # Errors
///
/// Returns an error when the file is missing or unreadable.
pub async fn read_upload(path: &Path) -> Result<UploadFile, UploadError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            UploadError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            UploadError::FileReadError {
                message: format!("{}: {}", path.display(), e),
            }
        }
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();

    let mime = mime_guess::from_path(path).first().map(|m| m.to_string());

    Ok(UploadFile {
        file_name,
        mime,
        bytes,
    })
}
