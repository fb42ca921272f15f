//! REST endpoint paths.

use quay_domain::DomainError;

/// Authentication endpoints.
pub mod auth {
    /// E-mail/password login.
    pub const LOGIN: &str = "/v1/auth/login";
    /// OAuth authorization code exchange.
    pub const OAUTH_CALLBACK: &str = "/v1/auth/oauth/callback";
    /// Signup, first step.
    pub const SIGNUP_INITIATE: &str = "/v1/auth/signup/initiate";
    /// Signup, OTP step.
    pub const SIGNUP_COMPLETE: &str = "/v1/auth/signup/complete";
    /// Standalone OTP verification.
    pub const VERIFY_OTP: &str = "/v1/auth/verify-otp";
    /// Request a reset mail.
    pub const FORGOT_PASSWORD: &str = "/v1/auth/forgot-password";
    /// Set a new password from a reset token.
    pub const RESET_PASSWORD: &str = "/v1/auth/reset-password";
    /// Exchange the refresh token for a new access token.
    pub const REFRESH: &str = "/v1/auth/refresh-token";
    /// Invalidate the session server-side.
    pub const LOGOUT: &str = "/v1/auth/logout";

    /// Endpoints whose 401 means "bad credentials", never "token expired".
    pub const CREDENTIAL_ENDPOINTS: &[&str] = &[
        LOGIN,
        OAUTH_CALLBACK,
        SIGNUP_INITIATE,
        SIGNUP_COMPLETE,
        VERIFY_OTP,
        FORGOT_PASSWORD,
        RESET_PASSWORD,
        REFRESH,
    ];
}

/// Container collection.
pub const CONTAINERS: &str = "/v1/containers";
/// Gate operation collection.
pub const GATE_OPERATIONS: &str = "/v1/gate-operations";
/// Vehicle registry.
pub const VEHICLES: &str = "/v1/vehicles";
/// Yard equipment.
pub const EQUIPMENT: &str = "/v1/equipment";
/// Yard blocks.
pub const YARD_BLOCKS: &str = "/v1/yard-blocks";
/// Shipping lines.
pub const SHIPPING_LINES: &str = "/v1/shipping-lines";
/// User administration.
pub const USERS: &str = "/v1/admin/users";
/// Audit trail.
pub const AUDIT_LOGS: &str = "/v1/audit-logs";
/// The signed-in user's profile.
pub const PROFILE: &str = "/v1/profile";
/// Dashboard counters.
pub const DASHBOARD_STATS: &str = "/v1/dashboard/stats";

/// Returns true when a 401 from `path` must not trigger a token refresh.
#[must_use]
pub fn is_credential_endpoint(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or_default().trim_end_matches('/');
    auth::CREDENTIAL_ENDPOINTS.contains(&path)
}

/// Joins a collection path and a resource id.
///
/// # Errors
/// Returns [`DomainError::InvalidIdentifier`] for an empty id or one that
/// would escape its collection.
pub fn item(collection: &str, id: &str) -> Result<String, DomainError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) || id == ".." {
        return Err(DomainError::InvalidIdentifier(id.to_string()));
    }
    Ok(format!("{collection}/{id}"))
}

/// Joins a collection path, a resource id and a sub-resource.
///
/// # Errors
/// Same as [`item`].
pub fn item_action(collection: &str, id: &str, action: &str) -> Result<String, DomainError> {
    Ok(format!("{}/{action}", item(collection, id)?))
}
