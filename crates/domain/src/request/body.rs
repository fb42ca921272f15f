//! HTTP Request body types

use serde::Serialize;

use crate::error::{DomainError, DomainResult};

/// One part of a multipart form upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    /// Form field name.
    pub name: String,
    /// File name sent with the part.
    pub file_name: String,
    /// MIME type of the content, if known.
    pub mime_type: Option<String>,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// HTTP request body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// JSON document
    Json(serde_json::Value),
    /// Multipart form data, used for profile image upload
    Multipart(Vec<MultipartPart>),
}

impl RequestBody {
    /// Serializes a value into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json<T: Serialize>(value: &T) -> DomainResult<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Returns whether the body is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the content type if applicable.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Json(_) => Some("application/json"),
            Self::Multipart(_) => Some("multipart/form-data"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body() {
        let body = RequestBody::json(&serde_json::json!({"email": "a@b.io"})).unwrap();
        assert_eq!(body.content_type(), Some("application/json"));
        assert!(!body.is_empty());
    }

    #[test]
    fn test_empty_body() {
        let body = RequestBody::None;
        assert!(body.is_empty());
        assert_eq!(body.content_type(), None);
    }
}
