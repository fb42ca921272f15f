//! Login, signup and password recovery.

use std::sync::Arc;

use quay_domain::{
    ApiRequest, AuthResponse, ForgotPasswordRequest, LoginRequest, OAuthExchangeRequest,
    OtpRequest, ResetPasswordRequest, Session, SignupRequest, Validate, ValidationErrors,
};
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::endpoints::auth;
use crate::error::ApiResult;

/// Authentication endpoints.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    /// Creates the service over a shared client.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Signs in with e-mail and password and persists the session.
    ///
    /// # Errors
    /// - [`ApiError::Validation`](crate::ApiError::Validation) for a malformed form
    /// - [`ApiError::Authentication`](crate::ApiError::Authentication) for wrong credentials
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<Session> {
        request.validate()?;
        let response: AuthResponse = self
            .client
            .execute(ApiRequest::post(auth::LOGIN).with_json(request)?)
            .await?;
        self.client.start_session(&response).await
    }

    /// Exchanges an OAuth authorization code for a session.
    ///
    /// # Errors
    /// Fails when the code is missing or the provider rejects it.
    pub async fn exchange_oauth_code(&self, request: &OAuthExchangeRequest) -> ApiResult<Session> {
        if request.code.trim().is_empty() {
            let mut errors = ValidationErrors::default();
            errors.add("code", "Authorization code is missing");
            return Err(errors.into());
        }
        let response: AuthResponse = self
            .client
            .execute(ApiRequest::post(auth::OAUTH_CALLBACK).with_json(request)?)
            .await?;
        self.client.start_session(&response).await
    }

    /// Starts a signup. The server mails an OTP to complete it.
    ///
    /// # Errors
    /// Fails on invalid input or when the address is taken.
    pub async fn signup_initiate(&self, request: &SignupRequest) -> ApiResult<()> {
        request.validate()?;
        self.client
            .execute_empty(ApiRequest::post(auth::SIGNUP_INITIATE).with_json(request)?)
            .await
    }

    /// Completes a signup with the mailed OTP and persists the new session.
    ///
    /// # Errors
    /// Fails on a malformed or rejected OTP.
    pub async fn signup_complete(&self, request: &OtpRequest) -> ApiResult<Session> {
        request.validate()?;
        let response: AuthResponse = self
            .client
            .execute(ApiRequest::post(auth::SIGNUP_COMPLETE).with_json(request)?)
            .await?;
        self.client.start_session(&response).await
    }

    /// Verifies an OTP without starting a session.
    ///
    /// # Errors
    /// Fails on a malformed or rejected OTP.
    pub async fn verify_otp(&self, request: &OtpRequest) -> ApiResult<()> {
        request.validate()?;
        self.client
            .execute_empty(ApiRequest::post(auth::VERIFY_OTP).with_json(request)?)
            .await
    }

    /// Requests a password-reset mail.
    ///
    /// # Errors
    /// Fails on a malformed address or a server error.
    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<()> {
        request.validate()?;
        self.client
            .execute_empty(ApiRequest::post(auth::FORGOT_PASSWORD).with_json(request)?)
            .await
    }

    /// Sets a new password from a reset token.
    ///
    /// # Errors
    /// Fails on invalid input or an expired token.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<()> {
        request.validate()?;
        self.client
            .execute_empty(ApiRequest::post(auth::RESET_PASSWORD).with_json(request)?)
            .await
    }

    /// Forces a token refresh and returns the new access token.
    ///
    /// # Errors
    /// [`ApiError::RefreshFailed`](crate::ApiError::RefreshFailed); the session is cleared.
    pub async fn refresh(&self) -> ApiResult<String> {
        self.client.refresh().await
    }

    /// Signs out. Local credentials are cleared even when the server call
    /// fails.
    ///
    /// # Errors
    /// Only fails when the local credentials cannot be removed.
    pub async fn logout(&self) -> ApiResult<()> {
        if let Err(e) = self
            .client
            .execute_empty(ApiRequest::post(auth::LOGOUT))
            .await
        {
            warn!(error = %e, "server logout failed, clearing local session anyway");
        }
        self.client.end_session().await?;
        info!("logged out");
        Ok(())
    }

    /// The persisted session.
    ///
    /// # Errors
    /// Fails when the credential store cannot be read.
    pub async fn current_session(&self) -> ApiResult<Session> {
        self.client.session().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::MemoryCredentialStore;
    use crate::error::ApiError;
    use crate::testing::ScriptedTransport;
    use pretty_assertions::assert_eq;
    use quay_domain::{ApiResponse, Role};
    use serde_json::json;

    fn service(transport: &Arc<ScriptedTransport>, store: &MemoryCredentialStore) -> AuthService {
        AuthService::new(Arc::new(ApiClient::new(
            transport.clone(),
            Arc::new(store.clone()),
        )))
    }

    fn login_ok() -> ApiResponse {
        ApiResponse::json(
            200,
            &json!({
                "accessToken": "access-1",
                "refreshToken": "refresh-1",
                "user": {"id": "u1", "name": "Op", "email": "op@quay.io", "role": "operator"}
            }),
        )
    }

    #[tokio::test]
    async fn login_persists_session() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(login_ok())));
        let store = MemoryCredentialStore::new();
        let service = service(&transport, &store);

        let session = service
            .login(&LoginRequest {
                email: "op@quay.io".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(session.role(), Some(Role::Operator));
        assert_eq!(store.snapshot().await, session);
        let sent = transport.last().unwrap();
        assert_eq!(sent.path, auth::LOGIN);
        assert_eq!(sent.bearer_token(), None);
    }

    #[tokio::test]
    async fn invalid_login_never_hits_the_server() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(login_ok())));
        let store = MemoryCredentialStore::new();

        let err = service(&transport, &store)
            .login(&LoginRequest {
                email: "not-an-email".to_string(),
                password: String::new(),
            })
            .await
            .unwrap_err();

        let ApiError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn logout_clears_even_when_server_fails() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(ApiResponse::json(500, &json!({"message": "down"})))
        }));
        let store = MemoryCredentialStore::with_session(Session {
            access_token: Some("a".to_string()),
            refresh_token: Some("r".to_string()),
            user: None,
        });
        let service = service(&transport, &store);

        service.logout().await.unwrap();

        assert_eq!(store.snapshot().await, Session::default());
        assert_eq!(transport.count(auth::LOGOUT), 1);
    }

    #[tokio::test]
    async fn empty_oauth_code_is_rejected() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(login_ok())));
        let store = MemoryCredentialStore::new();

        let err = service(&transport, &store)
            .exchange_oauth_code(&OAuthExchangeRequest {
                provider: "google".to_string(),
                code: " ".to_string(),
                redirect_uri: "http://localhost/oauth/callback".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn signup_complete_starts_session() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(login_ok())));
        let store = MemoryCredentialStore::new();

        let session = service(&transport, &store)
            .signup_complete(&OtpRequest {
                email: "op@quay.io".to_string(),
                otp: "123456".to_string(),
            })
            .await
            .unwrap();

        assert!(session.is_authenticated());
        assert_eq!(transport.last().unwrap().path, auth::SIGNUP_COMPLETE);
    }
}
