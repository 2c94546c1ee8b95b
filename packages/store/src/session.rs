//! # Session store: the client-held token pair
//!
//! [`SessionStore`] is the single owner of the access/refresh token pair. It
//! is created once at app start via [`SessionStore::load`], which reads the
//! persisted keys, and is cleared at logout or when the backend reports the
//! access token as no longer valid.
//!
//! Reads (`is_authenticated`, `auth_header`, `session`) are synchronous and
//! served from an in-memory copy so the route guard can evaluate on every
//! navigation without touching storage. Writes go through to the backing
//! [`TokenStorage`] first and only then update the in-memory copy; a pair
//! that cannot be fully persisted is rolled back.
//!
//! Token presence alone decides the authenticated state. The refresh token is
//! kept for completeness but never used to renew the access token: an expired
//! token surfaces as an authorization failure and the session is cleared.

use std::sync::{Arc, PoisonError, RwLock};

use crate::models::TokenPair;
use crate::storage::{StorageError, TokenStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Header name attached to authenticated requests.
pub const AUTHORIZATION: &str = "Authorization";

/// Snapshot of the client session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl Session {
    /// Authenticated iff an access token is present.
    pub fn is_authenticated(&self) -> bool {
        self.access.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Owned session store. Clones share the same session and storage.
#[derive(Clone, Debug)]
pub struct SessionStore<S: TokenStorage> {
    storage: S,
    current: Arc<RwLock<Session>>,
}

impl<S: TokenStorage> SessionStore<S> {
    /// Open the store and restore any persisted tokens.
    pub async fn load(storage: S) -> Self {
        let access = non_empty(storage.get(ACCESS_TOKEN_KEY).await);
        let refresh = non_empty(storage.get(REFRESH_TOKEN_KEY).await);
        tracing::debug!(restored = access.is_some(), "session loaded");
        Self {
            storage,
            current: Arc::new(RwLock::new(Session { access, refresh })),
        }
    }

    /// Persist a fresh token pair and make it the current session.
    ///
    /// Both keys are written or neither is: if the refresh write fails the
    /// access key is removed again and the client is left signed out.
    pub async fn set_session(&self, tokens: TokenPair) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, &tokens.access).await?;
        if let Err(e) = self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh).await {
            tracing::warn!(error = %e, "refresh token write failed, rolling back");
            *self.current.write().unwrap_or_else(PoisonError::into_inner) = Session::default();
            for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
                if let Err(e) = self.storage.remove(key).await {
                    tracing::warn!(key, error = %e, "failed to roll back token");
                }
            }
            return Err(e);
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Session {
            access: non_empty(Some(tokens.access)),
            refresh: non_empty(Some(tokens.refresh)),
        };
        tracing::info!("session established");
        Ok(())
    }

    /// Forget the session and remove every persisted key.
    ///
    /// The in-memory session is dropped even if storage removal fails, so a
    /// failed delete never leaves the client looking signed in.
    pub async fn clear_session(&self) -> Result<(), StorageError> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Session::default();
        let access = self.storage.remove(ACCESS_TOKEN_KEY).await;
        let refresh = self.storage.remove(REFRESH_TOKEN_KEY).await;
        tracing::info!("session cleared");
        access.and(refresh)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn session(&self) -> Session {
        self.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().access.clone()
    }

    /// `("Authorization", "Bearer <access>")` when a token is held.
    pub fn auth_header(&self) -> Option<(&'static str, String)> {
        self.read()
            .access
            .as_ref()
            .map(|token| (AUTHORIZATION, format!("Bearer {token}")))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;

    /// Memory storage whose refresh-token writes always fail.
    #[derive(Clone, Debug, Default)]
    struct RefreshWriteFails(MemoryStorage);

    impl TokenStorage for RefreshWriteFails {
        async fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == REFRESH_TOKEN_KEY {
                return Err(std::io::Error::other("disk full").into());
            }
            self.0.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.0.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_starts_unauthenticated() {
        let store = SessionStore::load(MemoryStorage::new()).await;
        assert!(!store.is_authenticated());
        assert!(store.auth_header().is_none());
        assert_eq!(store.session(), Session::default());
    }

    #[tokio::test]
    async fn test_set_session_persists_both_keys() {
        let storage = MemoryStorage::new();
        let store = SessionStore::load(storage.clone()).await;

        store
            .set_session(TokenPair::new("acc", "ref"))
            .await
            .unwrap();

        assert!(store.is_authenticated());
        assert_eq!(
            store.auth_header(),
            Some((AUTHORIZATION, "Bearer acc".to_string()))
        );
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).await.as_deref(), Some("acc"));
        assert_eq!(storage.get(REFRESH_TOKEN_KEY).await.as_deref(), Some("ref"));
    }

    #[tokio::test]
    async fn test_failed_refresh_write_leaves_no_session() {
        let inner = MemoryStorage::new();
        let store = SessionStore::load(RefreshWriteFails(inner.clone())).await;

        let err = store.set_session(TokenPair::new("acc", "ref")).await;
        assert!(matches!(err, Err(StorageError::Io(_))));
        assert!(!store.is_authenticated());
        assert!(inner.get(ACCESS_TOKEN_KEY).await.is_none());

        let restarted = SessionStore::load(inner).await;
        assert!(!restarted.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_refresh_write_drops_previous_session() {
        let inner = MemoryStorage::new();
        inner.set(ACCESS_TOKEN_KEY, "old").await.unwrap();
        let store = SessionStore::load(RefreshWriteFails(inner.clone())).await;
        assert!(store.is_authenticated());

        assert!(store.set_session(TokenPair::new("new", "ref")).await.is_err());
        assert!(!store.is_authenticated());
        assert!(inner.is_empty());
    }

    #[tokio::test]
    async fn test_load_restores_persisted_tokens() {
        let storage = MemoryStorage::new();
        storage.set(ACCESS_TOKEN_KEY, "persisted").await.unwrap();

        let store = SessionStore::load(storage).await;
        assert!(store.is_authenticated());
        assert_eq!(store.access_token().as_deref(), Some("persisted"));
        assert!(store.session().refresh.is_none());
    }

    #[tokio::test]
    async fn test_empty_access_token_is_not_a_session() {
        let storage = MemoryStorage::new();
        storage.set(ACCESS_TOKEN_KEY, "   ").await.unwrap();
        let store = SessionStore::load(storage).await;
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_clear_session_removes_all_keys() {
        let storage = MemoryStorage::new();
        let store = SessionStore::load(storage.clone()).await;
        store
            .set_session(TokenPair::new("acc", "ref"))
            .await
            .unwrap();

        store.clear_session().await.unwrap();

        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_clones_observe_the_same_session() {
        let store = SessionStore::load(MemoryStorage::new()).await;
        let reader = store.clone();
        store
            .set_session(TokenPair::new("acc", "ref"))
            .await
            .unwrap();
        assert!(reader.is_authenticated());

        reader.clear_session().await.unwrap();
        assert!(!store.is_authenticated());
    }
}
