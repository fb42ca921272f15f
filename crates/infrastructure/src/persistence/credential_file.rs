//! Session persistence.
//!
//! Stores the session in the platform-specific config directory:
//! - Linux: ~/.config/quay/session.json
//! - macOS: ~/Library/Application Support/quay/session.json
//! - Windows: %APPDATA%/quay/session.json

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quay_application::ports::{CredentialStore, CredentialStoreError};
use quay_domain::Session;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::serialization::{from_json_bytes, to_json_pretty};

/// Credential store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns `<config dir>/quay/session.json`, if a config dir exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("quay").join("session.json"))
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_error(error: &std::io::Error) -> CredentialStoreError {
    CredentialStoreError::Io(error.to_string())
}

/// Writes `bytes` to a fresh file that only the owner can read.
///
/// A leftover file is removed first, since the mode only applies on creation.
async fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    /// Returns an empty session when the file is missing or unreadable as
    /// JSON; a corrupt file must not lock the user out of logging in again.
    async fn load(&self) -> Result<Session, CredentialStoreError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Session::default()),
            Err(e) => return Err(io_error(&e)),
        };

        match from_json_bytes(&content) {
            Ok(session) => Ok(session),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(Session::default())
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| io_error(&e))?;
        }

        let content = to_json_pretty(session)
            .map_err(|e| CredentialStoreError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        write_private(&tmp, content.as_bytes())
            .await
            .map_err(|e| io_error(&e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| io_error(&e))?;

        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "session file removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn session() -> Session {
        Session {
            access_token: Some("access".to_string()),
            refresh_token: Some("refresh".to_string()),
            user: None,
        }
    }

    #[test]
    fn default_path_is_under_quay() {
        if let Some(p) = FileCredentialStore::default_path() {
            assert!(p.ends_with("quay/session.json"));
        }
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_session() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().await.unwrap(), Session::default());
    }

    #[tokio::test]
    async fn save_creates_parent_dirs_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested/quay/session.json"));

        store.save(&session()).await.unwrap();

        assert_eq!(store.load().await.unwrap(), session());
        assert!(!dir.path().join("nested/quay/session.json.tmp").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("session.json"));
        store.save(&session()).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn leftover_temp_file_does_not_keep_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("session.json"));
        let tmp = dir.path().join("session.json.tmp");
        std::fs::write(&tmp, "stale").unwrap();
        std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&session()).await.unwrap();

        assert!(!tmp.exists());
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().await.unwrap(), session());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn private_write_creates_owner_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret");
        write_private(&path, b"token").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read(&path).unwrap(), b"token");
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("session.json"));
        store.save(&session()).await.unwrap();

        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert!(!store.path().exists());
        assert_eq!(store.load().await.unwrap(), Session::default());
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{oops").unwrap();

        let store = FileCredentialStore::new(path);
        assert_eq!(store.load().await.unwrap(), Session::default());
    }
}
