//! In-memory credential storage.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quay_domain::Session;
use tokio::sync::RwLock;

use crate::ports::{CredentialStore, CredentialStoreError};

/// Thread-safe credential store that never touches the disk.
///
/// Counts `clear` calls so callers can check how often a session was wiped.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    session: Arc<RwLock<Session>>,
    clears: Arc<AtomicUsize>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `session`.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            clears: Arc::default(),
        }
    }

    /// Current contents.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Number of times [`CredentialStore::clear`] was called.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Session, CredentialStoreError> {
        Ok(self.session.read().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), CredentialStoreError> {
        let mut stored = self.session.write().await;
        stored.clone_from(session);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        self.session.write().await.clear();
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn save_load_clear() {
        let store = MemoryCredentialStore::new();
        let session = Session {
            access_token: Some("a".to_string()),
            refresh_token: Some("r".to_string()),
            user: None,
        };

        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), session);

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), Session::default());
        assert_eq!(store.clear_count(), 1);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryCredentialStore::new();
        let other = store.clone();
        store
            .save(&Session {
                access_token: Some("shared".to_string()),
                ..Session::default()
            })
            .await
            .unwrap();
        assert_eq!(other.snapshot().await.access_token.as_deref(), Some("shared"));
    }
}
