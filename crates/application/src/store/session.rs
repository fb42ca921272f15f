//! Authentication state.

use std::future::Future;

use quay_domain::{GuardDecision, Loadable, Role, Router, Session, User};
use tracing::warn;

use crate::error::{ApiError, ApiResult};

/// The current session plus the state of the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSlice {
    /// Persisted credentials and cached user.
    pub session: Session,
    /// State of the last login attempt.
    pub login: Loadable<User>,
}

impl SessionSlice {
    /// Starts from a restored session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        let login = session
            .user
            .clone()
            .map_or(Loadable::Idle, Loadable::Success);
        Self { session, login }
    }

    /// Whether an access token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Role of the signed-in user.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session.role()
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    /// Runs a login-type action (password, OAuth, signup completion).
    ///
    /// # Errors
    /// Returns the action's error after recording it in `login`.
    pub async fn sign_in<F>(&mut self, action: F) -> ApiResult<()>
    where
        F: Future<Output = ApiResult<Session>>,
    {
        self.login.start();
        match action.await {
            Ok(session) => {
                *self = Self::new(session);
                Ok(())
            }
            Err(e) => {
                self.login = Loadable::Error(e.user_message());
                Err(e)
            }
        }
    }

    /// Runs a logout. The local state is cleared whatever the outcome.
    ///
    /// # Errors
    /// Returns the action's error.
    pub async fn sign_out<F>(&mut self, action: F) -> ApiResult<()>
    where
        F: Future<Output = ApiResult<()>>,
    {
        let result = action.await;
        *self = Self::default();
        result
    }

    /// Reacts to an error from any other slice: a failed refresh ends the
    /// session.
    pub fn observe(&mut self, error: &ApiError) {
        if error.requires_login() {
            warn!("session expired, signing out");
            self.session.clear();
            self.login = Loadable::Error(error.user_message());
        }
    }

    /// Route guard decision for `path` under the current session.
    #[must_use]
    pub fn guard(&self, router: &Router, path: &str) -> GuardDecision {
        router.guard(path, &self.session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn admin_session() -> Session {
        Session {
            access_token: Some("a".to_string()),
            refresh_token: None,
            user: Some(User {
                id: "1".to_string(),
                name: "Root".to_string(),
                email: "root@quay.io".to_string(),
                role: Role::Admin,
                phone: None,
                company: None,
                profile_image: None,
                blocked: false,
                created_at: None,
            }),
        }
    }

    #[tokio::test]
    async fn sign_in_records_user() {
        let mut slice = SessionSlice::default();
        slice.sign_in(async { Ok(admin_session()) }).await.unwrap();

        assert!(slice.is_authenticated());
        assert_eq!(slice.role(), Some(Role::Admin));
        assert!(slice.login.is_success());
        assert_eq!(
            slice.guard(&Router::terminal(), "/"),
            GuardDecision::Redirect("/admin/dashboard")
        );
    }

    #[tokio::test]
    async fn failed_sign_in_keeps_message() {
        let mut slice = SessionSlice::default();
        let result = slice
            .sign_in(async {
                Err(ApiError::Authentication {
                    message: "Invalid credentials".to_string(),
                })
            })
            .await;

        assert!(result.is_err());
        assert!(!slice.is_authenticated());
        assert_eq!(slice.login.error(), Some("Invalid credentials"));
    }

    #[test]
    fn refresh_failure_ends_session() {
        let mut slice = SessionSlice::new(admin_session());
        slice.observe(&ApiError::Http {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(slice.is_authenticated());

        slice.observe(&ApiError::RefreshFailed(Box::new(ApiError::Decode(
            "bad".to_string(),
        ))));
        assert!(!slice.is_authenticated());
        assert!(matches!(
            slice.guard(&Router::terminal(), "/admin/users"),
            GuardDecision::RedirectToLogin { .. }
        ));
    }
}
