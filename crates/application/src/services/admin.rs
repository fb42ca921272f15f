//! User administration and dashboard counters.

use std::sync::Arc;

use quay_domain::{
    ApiRequest, DashboardStats, Page, PageRequest, User, UserFilter, UserInput, Validate,
};
use serde::Serialize;
use tracing::info;

use super::fetch_page;
use crate::client::ApiClient;
use crate::endpoints::{self, DASHBOARD_STATS, USERS};
use crate::error::ApiResult;

#[derive(Serialize)]
struct BlockUpdate {
    blocked: bool,
}

/// Admin console endpoints.
#[derive(Debug, Clone)]
pub struct AdminService {
    client: Arc<ApiClient>,
}

impl AdminService {
    /// Creates the service over a shared client.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Lists user accounts.
    ///
    /// # Errors
    /// Propagates request and decode failures.
    pub async fn list_users(&self, filter: &UserFilter, page: PageRequest) -> ApiResult<Page<User>> {
        fetch_page(&self.client, USERS, filter, page).await
    }

    /// Fetches one account.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn get_user(&self, id: &str) -> ApiResult<User> {
        self.client
            .execute(ApiRequest::get(endpoints::item(USERS, id)?))
            .await
    }

    /// Creates an account. An initial password is required.
    ///
    /// # Errors
    /// Fails on invalid input or a taken e-mail.
    pub async fn create_user(&self, input: &UserInput) -> ApiResult<User> {
        if input.password.as_deref().is_none_or(|p| p.trim().is_empty()) {
            let mut errors = input.validate().err().unwrap_or_default();
            errors.add("password", "Password is required");
            return Err(errors.into());
        }
        input.validate()?;
        self.client
            .execute(ApiRequest::post(USERS).with_json(input)?)
            .await
    }

    /// Replaces an account's details.
    ///
    /// # Errors
    /// Fails on invalid input or an unknown id.
    pub async fn update_user(&self, id: &str, input: &UserInput) -> ApiResult<User> {
        input.validate()?;
        self.client
            .execute(ApiRequest::put(endpoints::item(USERS, id)?).with_json(input)?)
            .await
    }

    /// Deletes an account.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.client
            .execute_empty(ApiRequest::delete(endpoints::item(USERS, id)?))
            .await
    }

    /// Blocks or unblocks an account.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn set_blocked(&self, id: &str, blocked: bool) -> ApiResult<User> {
        let user: User = self
            .client
            .execute(
                ApiRequest::patch(endpoints::item_action(USERS, id, "block")?)
                    .with_json(&BlockUpdate { blocked })?,
            )
            .await?;
        info!(user = %user.id, blocked, "user block flag updated");
        Ok(user)
    }

    /// Server-computed dashboard counters.
    ///
    /// # Errors
    /// Propagates request and decode failures.
    pub async fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        self.client.execute(ApiRequest::get(DASHBOARD_STATS)).await
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
    use quay_domain::{ApiResponse, RequestBody, Role};
    use serde_json::json;

    fn service(transport: &Arc<ScriptedTransport>) -> AdminService {
        AdminService::new(Arc::new(ApiClient::new(
            transport.clone(),
            Arc::new(MemoryCredentialStore::new()),
        )))
    }

    #[tokio::test]
    async fn block_sends_flag() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(ApiResponse::json(
                200,
                &json!({"id": "u2", "name": "Bo", "email": "bo@quay.io", "role": "customer", "blocked": true}),
            ))
        }));

        let user = service(&transport).set_blocked("u2", true).await.unwrap();

        assert!(user.blocked);
        let sent = transport.last().unwrap();
        assert_eq!(sent.path, "/v1/admin/users/u2/block");
        assert_eq!(sent.body, RequestBody::Json(json!({"blocked": true})));
    }

    #[tokio::test]
    async fn create_requires_password() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(ApiResponse::new(201, Vec::new()))));

        let err = service(&transport)
            .create_user(&UserInput {
                name: "Bo".to_string(),
                email: "bo@quay.io".to_string(),
                role: Role::Operator,
                phone: None,
                company: None,
                password: None,
            })
            .await
            .unwrap_err();

        let ApiError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("password"), Some("Password is required"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn forbidden_for_non_admins() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(ApiResponse::json(403, &json!({"message": "Admins only"})))
        }));

        let err = service(&transport).dashboard_stats().await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Forbidden {
                message: "Admins only".to_string()
            }
        );
        assert_eq!(err.user_message(), "Admins only");
    }
}
