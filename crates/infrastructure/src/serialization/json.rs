//! JSON encoding for the session file and CLI output.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error type for JSON encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// A value could not be encoded.
    #[error("could not encode JSON: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Input was not valid JSON for the expected type.
    #[error("could not decode JSON: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Encodes a value as two-space indented JSON followed by a newline, the
/// layout used for files a user may open in an editor.
///
/// # Errors
///
/// Returns an error if the value cannot be represented as JSON.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, SerializationError> {
    let mut json = serde_json::to_string_pretty(value).map_err(SerializationError::Serialize)?;
    json.push('\n');
    Ok(json)
}

/// Decodes JSON from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON of the expected shape.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quay_domain::Session;

    #[test]
    fn session_file_layout() {
        let session = Session {
            access_token: Some("abc".to_string()),
            refresh_token: None,
            user: None,
        };
        let json = to_json_pretty(&session).expect("serialization should work");
        assert_eq!(json, "{\n  \"accessToken\": \"abc\"\n}\n");
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result: Result<Session, _> = from_json_bytes(b"{not json");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
