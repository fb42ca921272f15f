//! Application error types

use quay_domain::{ApiResponse, DomainError, ValidationErrors};
use thiserror::Error;

use crate::ports::{CredentialStoreError, TransportError};

/// Errors surfaced to callers of the services.
///
/// Cloneable so a single refresh failure can be handed to every waiter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Bad credentials on a login-type endpoint.
    #[error("{message}")]
    Authentication {
        /// Server message or fallback.
        message: String,
    },

    /// The signed-in role may not perform this action.
    #[error("{message}")]
    Forbidden {
        /// Server message or fallback.
        message: String,
    },

    /// Any other non-success response.
    #[error("{message}")]
    Http {
        /// HTTP status.
        status: u16,
        /// Server message or fallback.
        message: String,
    },

    /// The token refresh failed; the session has been cleared.
    #[error("session expired: {0}")]
    RefreshFailed(#[source] Box<ApiError>),

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Persisted credentials could not be read or written.
    #[error(transparent)]
    Storage(#[from] CredentialStoreError),

    /// A value was rejected by the domain layer.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    /// Maps a non-success response into an error, preferring the server's
    /// own message.
    #[must_use]
    pub fn from_response(response: &ApiResponse, credential_endpoint: bool) -> Self {
        let message = response
            .error_message()
            .unwrap_or_else(|| fallback_message(response.status).to_string());
        match response.status {
            401 if credential_endpoint => Self::Authentication { message },
            403 => Self::Forbidden { message },
            status => Self::Http { status, message },
        }
    }

    /// Text the UI shows for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::RefreshFailed(_) => "Your session has expired. Please sign in again.".to_string(),
            Self::Transport(_) => "Network error. Check your connection and try again.".to_string(),
            Self::Decode(_) | Self::Storage(_) => fallback_message(500).to_string(),
            other => other.to_string(),
        }
    }

    /// Whether a read can reasonably be retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }

    /// Whether the user has to sign in again.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::RefreshFailed(_))
    }
}

/// Generic message for a status without a server-provided one.
#[must_use]
pub const fn fallback_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request",
        401 => "Invalid credentials",
        403 => "You are not allowed to perform this action",
        404 => "Resource not found",
        409 => "Resource already exists",
        500..=599 => "Server error. Please try again later.",
        _ => "Something went wrong. Please try again.",
    }
}

/// Result type alias for application operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn login_401_is_an_authentication_error() {
        let response = ApiResponse::json(401, &json!({"message": "Wrong password"}));
        assert_eq!(
            ApiError::from_response(&response, true),
            ApiError::Authentication {
                message: "Wrong password".to_string()
            }
        );
    }

    #[test]
    fn missing_message_uses_fallback() {
        let response = ApiResponse::new(503, Vec::new());
        let error = ApiError::from_response(&response, false);
        assert_eq!(error.user_message(), "Server error. Please try again later.");
        assert!(error.is_retryable());
    }

    #[test]
    fn forbidden_is_not_retryable() {
        let response = ApiResponse::new(403, Vec::new());
        let error = ApiError::from_response(&response, false);
        assert!(matches!(error, ApiError::Forbidden { .. }));
        assert!(!error.is_retryable());
    }

    #[test]
    fn refresh_failure_requires_login() {
        let error = ApiError::RefreshFailed(Box::new(ApiError::Http {
            status: 401,
            message: "Refresh token expired".to_string(),
        }));
        assert!(error.requires_login());
        assert_eq!(error.to_string(), "session expired: Refresh token expired");
    }
}
