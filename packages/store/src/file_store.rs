//! # Filesystem-backed token storage
//!
//! [`FileStorage`] is a [`TokenStorage`] implementation that writes each key
//! to its own file. It is used on desktop and mobile so a signed-in session
//! survives app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── access_token
//! └── refresh_token
//! ```
//!
//! ## Platform data directories
//!
//! [`FileStorage::default_dir`] resolves `<data_dir>/campus-stream/` through
//! [`dirs::data_dir()`]:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS / iOS | `~/Library/Application Support/campus-stream/` |
//! | Linux | `~/.local/share/campus-stream/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\campus-stream\` |
//! | Android | App-internal storage (via `dirs`) |

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::storage::{check_key, StorageError, TokenStorage};

/// Filesystem-backed TokenStorage for desktop and mobile persistence.
#[derive(Clone, Debug)]
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// Platform data directory for the client, or `./campus-stream` when the
    /// platform reports none.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("campus-stream")
    }

    pub fn base(&self) -> &std::path::Path {
        &self.base
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }
}

impl TokenStorage for FileStorage {
    async fn get(&self, key: &str) -> Option<String> {
        check_key(key).ok()?;
        let content = std::fs::read_to_string(self.key_path(key)).ok()?;
        Some(content.trim_end_matches('\n').to_string())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        std::fs::create_dir_all(&self.base)?;
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::models::TokenPair;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "campus_stream_test_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let dir = scratch_dir("reopen");

        let store = SessionStore::load(FileStorage::new(dir.clone())).await;
        store
            .set_session(TokenPair::new("access-1", "refresh-1"))
            .await
            .unwrap();

        // Re-open from the same directory
        let reopened = SessionStore::load(FileStorage::new(dir.clone())).await;
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.access_token().as_deref(), Some("access-1"));
        assert_eq!(reopened.session().refresh.as_deref(), Some("refresh-1"));

        reopened.clear_session().await.unwrap();
        let cleared = SessionStore::load(FileStorage::new(dir.clone())).await;
        assert!(!cleared.is_authenticated());
        assert!(!dir.join("access_token").exists());
        assert!(!dir.join("refresh_token").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_unwritable_refresh_key_does_not_persist_access() {
        let dir = scratch_dir("unwritable");
        // A directory in place of the refresh file makes its write fail.
        std::fs::create_dir_all(dir.join("refresh_token")).unwrap();

        let store = SessionStore::load(FileStorage::new(dir.clone())).await;
        assert!(store
            .set_session(TokenPair::new("acc", "ref"))
            .await
            .is_err());
        assert!(!store.is_authenticated());

        let reopened = SessionStore::load(FileStorage::new(dir.clone())).await;
        assert!(!reopened.is_authenticated());
        assert!(!dir.join("access_token").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let dir = scratch_dir("missing");
        let storage = FileStorage::new(dir.clone());
        assert!(storage.remove("access_token").await.is_ok());
        assert!(storage.get("access_token").await.is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
