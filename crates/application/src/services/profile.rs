//! The signed-in user's own profile.

use std::sync::Arc;

use quay_domain::{
    ApiRequest, ChangePasswordRequest, MultipartPart, ProfileUpdate, RequestBody, User, Validate,
    ValidationErrors,
};

use crate::client::ApiClient;
use crate::endpoints::PROFILE;
use crate::error::ApiResult;

/// Largest accepted profile picture.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Profile endpoints.
#[derive(Debug, Clone)]
pub struct ProfileService {
    client: Arc<ApiClient>,
}

impl ProfileService {
    /// Creates the service over a shared client.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetches the profile.
    ///
    /// # Errors
    /// Propagates request and decode failures.
    pub async fn get(&self) -> ApiResult<User> {
        self.client.execute(ApiRequest::get(PROFILE)).await
    }

    /// Updates name, phone or company and refreshes the cached user.
    ///
    /// # Errors
    /// Propagates request, decode and storage failures.
    pub async fn update(&self, update: &ProfileUpdate) -> ApiResult<User> {
        let user: User = self
            .client
            .execute(ApiRequest::put(PROFILE).with_json(update)?)
            .await?;
        self.client.remember_user(&user).await?;
        Ok(user)
    }

    /// Changes the password.
    ///
    /// # Errors
    /// Fails on invalid input or a wrong current password.
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> ApiResult<()> {
        request.validate()?;
        self.client
            .execute_empty(ApiRequest::put(format!("{PROFILE}/password")).with_json(request)?)
            .await
    }

    /// Uploads a new profile picture as the `image` part of a multipart
    /// form.
    ///
    /// # Errors
    /// Fails for an empty or oversized file, or a non-image MIME type.
    pub async fn upload_image(
        &self,
        file_name: &str,
        mime_type: Option<String>,
        bytes: Vec<u8>,
    ) -> ApiResult<User> {
        let mut errors = ValidationErrors::default();
        if bytes.is_empty() {
            errors.add("image", "Image is empty");
        } else if bytes.len() > MAX_IMAGE_BYTES {
            errors.add("image", "Image must be 5 MB or smaller");
        }
        if mime_type.as_deref().is_some_and(|m| !m.starts_with("image/")) {
            errors.add("image", "File must be an image");
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let part = MultipartPart {
            name: "image".to_string(),
            file_name: file_name.to_string(),
            mime_type,
            bytes,
        };
        let user: User = self
            .client
            .execute(
                ApiRequest::put(format!("{PROFILE}/image"))
                    .with_body(RequestBody::Multipart(vec![part])),
            )
            .await?;
        self.client.remember_user(&user).await?;
        Ok(user)
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
    use quay_domain::{ApiResponse, Session};
    use serde_json::json;

    fn user_json(image: Option<&str>) -> serde_json::Value {
        json!({"id": "u1", "name": "Ana", "email": "ana@quay.io", "role": "customer", "profileImage": image})
    }

    #[tokio::test]
    async fn upload_sends_image_part_and_caches_user() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(ApiResponse::json(200, &user_json(Some("/img/u1.png"))))
        }));
        let store = MemoryCredentialStore::with_session(Session {
            access_token: Some("a".to_string()),
            refresh_token: None,
            user: None,
        });
        let service = ProfileService::new(Arc::new(ApiClient::new(
            transport.clone(),
            Arc::new(store.clone()),
        )));

        let user = service
            .upload_image("me.png", Some("image/png".to_string()), vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(user.profile_image.as_deref(), Some("/img/u1.png"));
        assert_eq!(store.snapshot().await.user, Some(user));
        let sent = transport.last().unwrap();
        assert_eq!(sent.path, "/v1/profile/image");
        let RequestBody::Multipart(parts) = sent.body else {
            panic!("expected multipart body");
        };
        assert_eq!(parts[0].name, "image");
        assert_eq!(parts[0].file_name, "me.png");
    }

    #[tokio::test]
    async fn rejects_non_images_locally() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(ApiResponse::json(200, &user_json(None)))));
        let service = ProfileService::new(Arc::new(ApiClient::new(
            transport.clone(),
            Arc::new(MemoryCredentialStore::new()),
        )));

        let err = service
            .upload_image("notes.txt", Some("text/plain".to_string()), vec![1])
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn password_confirmation_must_match() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(ApiResponse::new(204, Vec::new()))));
        let service = ProfileService::new(Arc::new(ApiClient::new(
            transport.clone(),
            Arc::new(MemoryCredentialStore::new()),
        )));

        let err = service
            .change_password(&ChangePasswordRequest {
                current_password: "old-secret".to_string(),
                new_password: "new-secret-1".to_string(),
                confirm_password: "new-secret-2".to_string(),
            })
            .await
            .unwrap_err();

        let ApiError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("confirmPassword"), Some("Passwords must match"));
    }
}
