//! Authentication request/response types

use serde::{Deserialize, Serialize};

use crate::user::{Role, User};

/// Credentials persisted between runs.
///
/// Cleared on logout and when a token refresh fails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Short-lived bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Long-lived token used to obtain a new access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Cached user object from the last login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Session {
    /// Builds a session from a successful auth response.
    #[must_use]
    pub fn from_response(response: &AuthResponse) -> Self {
        Self {
            access_token: Some(response.access_token.clone()),
            refresh_token: response.refresh_token.clone(),
            user: response.user.clone(),
        }
    }

    /// Returns true when an access token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Role of the cached user.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Removes the access token and cached user, keeping nothing usable.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// E-mail/password login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login e-mail.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Exchange of an OAuth authorization code for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthExchangeRequest {
    /// Identity provider, e.g. `google`.
    pub provider: String,
    /// Authorization code from the provider callback.
    pub code: String,
    /// Redirect URI used in the authorization request.
    pub redirect_uri: String,
}

/// First signup step; the server e-mails an OTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display name.
    pub name: String,
    /// Login e-mail.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation, checked client-side only.
    #[serde(skip)]
    pub confirm_password: String,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// OTP submission, used both to complete signup and to verify an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRequest {
    /// Address the OTP was sent to.
    pub email: String,
    /// One-time code.
    pub otp: String,
}

/// Request a password-reset mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Account e-mail.
    pub email: String,
}

/// Set a new password using the token from the reset mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Reset token.
    pub token: String,
    /// New password.
    pub new_password: String,
    /// Confirmation, checked client-side only.
    #[serde(skip)]
    pub confirm_password: String,
}

/// Body of a successful login, OAuth exchange or signup completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// New access token.
    pub access_token: String,
    /// New refresh token, when the server rotates it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// The authenticated user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Body sent to the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The stored refresh token, if any. Servers using an HTTP-only cookie
    /// accept an empty body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Body returned by the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// Rotated refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Returns a loggable preview of a token (first 8 chars + ...).
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.len() > 12 {
        let cut = token
            .char_indices()
            .nth(8)
            .map_or(token.len(), |(idx, _)| idx);
        format!("{}...", &token[..cut])
    } else {
        token.to_string()
    }
}
