//! Authenticated request dispatcher.
//!
//! [`ApiClient`] attaches the current bearer token to every request and
//! recovers from an expired token: a 401 on an ordinary endpoint triggers a
//! single-flight refresh through the [`RefreshCoordinator`], after which the
//! request is sent once more with the new token.

use std::sync::Arc;

use parking_lot::RwLock;
use quay_domain::{
    ApiRequest, ApiResponse, AuthResponse, RefreshRequest, RefreshResponse, Session, User,
    token_preview,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::auth::{Acquire, RefreshCoordinator, RefreshOutcome};
use crate::endpoints::{self, is_credential_endpoint};
use crate::error::{ApiError, ApiResult};
use crate::ports::{CredentialStore, Transport};

const AUTHORIZATION: &str = "Authorization";

/// A request on its way through the dispatcher.
///
/// Carries the retry-once flag: a context that has been retried after a
/// refresh is never refreshed again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// The request as the caller built it.
    pub request: ApiRequest,
    retried: bool,
}

impl RequestContext {
    /// Wraps a fresh request.
    #[must_use]
    pub const fn new(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }

    /// Whether this request was already re-sent after a refresh.
    #[must_use]
    pub const fn is_retried(&self) -> bool {
        self.retried
    }

    /// Whether a 401 on this request should trigger a refresh.
    #[must_use]
    pub fn may_refresh(&self) -> bool {
        !self.retried && !is_credential_endpoint(&self.request.path)
    }

    /// Marks the request as retried with `token`.
    fn retry_with(&mut self, token: &str) {
        self.retried = true;
        self.request
            .set_header(AUTHORIZATION, format!("Bearer {token}"));
    }
}

/// HTTP client shared by all services.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    access_token: RwLock<Option<String>>,
    coordinator: RefreshCoordinator,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field(
                "access_token",
                &self.access_token.read().as_deref().map(token_preview),
            )
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client with no token loaded. Call [`ApiClient::restore`] to
    /// pick up a persisted session.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
            access_token: RwLock::new(None),
            coordinator: RefreshCoordinator::new(),
        }
    }

    /// Loads the persisted session and adopts its access token.
    ///
    /// # Errors
    /// Returns [`ApiError::Storage`] if the credential store cannot be read.
    pub async fn restore(&self) -> ApiResult<Session> {
        let session = self.credentials.load().await?;
        self.set_access_token(session.access_token.clone());
        debug!(
            authenticated = session.is_authenticated(),
            "restored persisted session"
        );
        Ok(session)
    }

    /// The persisted session as currently stored.
    ///
    /// # Errors
    /// Returns [`ApiError::Storage`] if the credential store cannot be read.
    pub async fn session(&self) -> ApiResult<Session> {
        Ok(self.credentials.load().await?)
    }

    /// Token attached to outgoing requests.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.access_token.read().clone()
    }

    /// Replaces the token attached to outgoing requests.
    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write() = token;
    }

    /// Persists the credentials of a successful login and starts using them.
    ///
    /// # Errors
    /// Returns [`ApiError::Storage`] if the session cannot be saved.
    pub async fn start_session(&self, response: &AuthResponse) -> ApiResult<Session> {
        let session = Session::from_response(response);
        self.credentials.save(&session).await?;
        self.set_access_token(Some(response.access_token.clone()));
        info!(
            token = %token_preview(&response.access_token),
            role = ?session.role(),
            "session started"
        );
        Ok(session)
    }

    /// Replaces the cached user of a signed-in session, e.g. after a profile
    /// edit.
    ///
    /// # Errors
    /// Returns [`ApiError::Storage`] if the session cannot be saved.
    pub async fn remember_user(&self, user: &User) -> ApiResult<()> {
        let mut session = self.credentials.load().await?;
        if session.is_authenticated() {
            session.user = Some(user.clone());
            self.credentials.save(&session).await?;
        }
        Ok(())
    }

    /// Forgets the in-memory token and clears persisted credentials.
    ///
    /// The in-memory token is dropped even when the store fails.
    ///
    /// # Errors
    /// Returns [`ApiError::Storage`] if the persisted credentials cannot be
    /// removed.
    pub async fn end_session(&self) -> ApiResult<()> {
        self.set_access_token(None);
        self.credentials.clear().await?;
        info!("session ended");
        Ok(())
    }

    /// Sends a request and returns the raw response, whatever its status.
    ///
    /// A 401 on an ordinary endpoint refreshes the token (or waits for the
    /// refresh already running) and re-sends the request once. A second
    /// 401 is returned as-is.
    ///
    /// # Errors
    /// - [`ApiError::Transport`] if no response was received
    /// - [`ApiError::RefreshFailed`] if the token could not be refreshed
    pub async fn dispatch(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let mut context = RequestContext::new(request);
        loop {
            let (response, sent_token) = self.send_once(&context.request).await?;
            if !response.is_unauthorized() || !context.may_refresh() {
                return Ok(response);
            }
            let current = self.access_token();
            let changed = matches!(
                (sent_token.as_deref(), current.as_deref()),
                (Some(sent), Some(now)) if sent != now
            );
            let token = match current {
                Some(current) if changed => {
                    debug!(path = %context.request.path, "token changed while in flight");
                    current
                }
                _ => self.refresh().await?,
            };
            context.retry_with(&token);
            debug!(path = %context.request.path, "retrying with refreshed token");
        }
    }

    /// Sends a request, mapping any non-success response to an error.
    ///
    /// # Errors
    /// Everything [`ApiClient::dispatch`] returns, plus the mapped error
    /// response (see [`ApiError::from_response`]).
    pub async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let credential_endpoint = is_credential_endpoint(&request.path);
        let response = self.dispatch(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_response(&response, credential_endpoint))
        }
    }

    /// Sends a request and decodes its JSON body.
    ///
    /// # Errors
    /// As [`ApiClient::send`], plus [`ApiError::Decode`] for an unexpected
    /// body.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let response = self.send(request).await?;
        decode(&response)
    }

    /// Sends a request whose response body is irrelevant.
    ///
    /// # Errors
    /// As [`ApiClient::send`].
    pub async fn execute_empty(&self, request: ApiRequest) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }

    /// Sends one attempt. Also returns the token this call attached, if any.
    async fn send_once(&self, request: &ApiRequest) -> ApiResult<(ApiResponse, Option<String>)> {
        let mut outgoing = request.clone();
        let mut attached = None;
        if outgoing.header(AUTHORIZATION).is_none()
            && let Some(token) = self.access_token()
        {
            outgoing.set_header(AUTHORIZATION, format!("Bearer {token}"));
            attached = Some(token);
        }
        debug!(method = %outgoing.method, path = %outgoing.path, "sending request");
        let response = self.transport.send(&outgoing).await?;
        debug!(path = %outgoing.path, status = response.status, "received response");
        Ok((response, attached))
    }

    /// Obtains a new access token from the refresh endpoint.
    ///
    /// Concurrent callers share one refresh call and all receive its
    /// outcome. On failure the persisted credentials are cleared once, by
    /// the caller that performed the refresh.
    ///
    /// # Errors
    /// Returns [`ApiError::RefreshFailed`] wrapping the cause.
    pub async fn refresh(&self) -> RefreshOutcome {
        match self.coordinator.acquire() {
            Acquire::Follower(receiver) => {
                debug!("waiting for token refresh in flight");
                crate::auth::follow(receiver).await
            }
            Acquire::Leader(lease) => {
                info!("access token rejected, refreshing");
                let outcome = self
                    .refresh_access_token()
                    .await
                    .map_err(|e| ApiError::RefreshFailed(Box::new(e)));
                match &outcome {
                    Ok(token) => info!(token = %token_preview(token), "access token refreshed"),
                    Err(e) => {
                        warn!(error = %e, "token refresh failed, clearing credentials");
                        self.clear_credentials().await;
                    }
                }
                lease.settle(&outcome);
                outcome
            }
        }
    }

    async fn refresh_access_token(&self) -> ApiResult<String> {
        let mut session = self.credentials.load().await?;
        let request = ApiRequest::post(endpoints::auth::REFRESH).with_json(&RefreshRequest {
            refresh_token: session.refresh_token.clone(),
        })?;

        let response = self.transport.send(&request).await?;
        if !response.is_success() {
            return Err(ApiError::from_response(&response, true));
        }
        let refreshed: RefreshResponse = decode(&response)?;

        session.access_token = Some(refreshed.access_token.clone());
        if let Some(rotated) = refreshed.refresh_token {
            session.refresh_token = Some(rotated);
        }
        self.credentials.save(&session).await?;
        self.set_access_token(Some(refreshed.access_token.clone()));
        Ok(refreshed.access_token)
    }

    async fn clear_credentials(&self) {
        self.set_access_token(None);
        if let Err(e) = self.credentials.clear().await {
            warn!(error = %e, "failed to clear persisted credentials");
        }
    }
}

/// Decodes a JSON body, accepting both the bare value and a `{"data": ...}`
/// envelope.
///
/// # Errors
/// Returns [`ApiError::Decode`] when neither shape matches.
pub fn decode<T: DeserializeOwned>(response: &ApiResponse) -> ApiResult<T> {
    let value: serde_json::Value = response
        .json_body()
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    match serde_json::from_value::<T>(value.clone()) {
        Ok(decoded) => Ok(decoded),
        Err(e) => match value {
            serde_json::Value::Object(mut map) if map.contains_key("data") => {
                let data = map.remove("data").unwrap_or_default();
                serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
            }
            _ => Err(ApiError::Decode(e.to_string())),
        },
    }
}
