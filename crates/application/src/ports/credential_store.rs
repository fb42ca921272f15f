//! Persisted credentials port

use async_trait::async_trait;
use quay_domain::Session;
use thiserror::Error;

/// Error type for credential persistence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialStoreError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(String),

    /// Stored credentials could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Port for the access token, refresh token and cached user that survive
/// between runs.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Loads the stored session, or an empty one when nothing is stored.
    async fn load(&self) -> Result<Session, CredentialStoreError>;

    /// Replaces the stored session.
    async fn save(&self, session: &Session) -> Result<(), CredentialStoreError>;

    /// Removes all stored credentials.
    async fn clear(&self) -> Result<(), CredentialStoreError>;
}
