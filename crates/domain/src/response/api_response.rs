//! API response type
//!
//! A transport-neutral view of an HTTP response: status, headers and the raw
//! body, with helpers for decoding JSON and extracting server messages.

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// An HTTP response from the terminal API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, lower-cased names.
    pub headers: Vec<(String, String)>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiResponse {
    /// Creates a response with the given status and body.
    #[must_use]
    pub const fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    /// Creates a response with a JSON body.
    #[must_use]
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: value.to_string().into_bytes(),
        }
    }

    /// Returns true for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true for 401 Unauthorized.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Returns true for 403 Forbidden.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    /// Returns a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body as UTF-8 text (lossy).
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<T>` targets
    /// accept 204 responses.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the body does not match `T`.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_slice(b"null");
        }
        serde_json::from_slice(&self.body)
    }

    /// Extracts the server's error message (`message` or `error` field).
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(&self.body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_message_field() {
        let response = ApiResponse::json(400, &json!({"message": "Container already exists"}));
        assert_eq!(
            response.error_message().as_deref(),
            Some("Container already exists")
        );
    }

    #[test]
    fn falls_back_to_error_field() {
        let response = ApiResponse::json(500, &json!({"error": "boom"}));
        assert_eq!(response.error_message().as_deref(), Some("boom"));
    }

    #[test]
    fn no_message_for_plain_text() {
        let response = ApiResponse::new(502, b"Bad Gateway".to_vec());
        assert_eq!(response.error_message(), None);
    }

    #[test]
    fn empty_body_decodes_as_unit() {
        let response = ApiResponse::new(204, Vec::new());
        let decoded: Result<(), _> = response.json_body();
        assert!(decoded.is_ok());
    }

    #[test]
    fn status_helpers() {
        assert!(ApiResponse::new(201, Vec::new()).is_success());
        assert!(ApiResponse::new(401, Vec::new()).is_unauthorized());
        assert!(ApiResponse::new(403, Vec::new()).is_forbidden());
    }
}
