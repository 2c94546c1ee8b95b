//! # Durable key/value storage for client state
//!
//! The session survives a process restart by writing each token under a fixed
//! key through the [`TokenStorage`] trait. Implementations live in sibling
//! modules ([`crate::memory`], [`crate::file_store`]), so the same
//! [`SessionStore`](crate::SessionStore) logic works against an in-memory map
//! in tests and a data directory on device.

use std::future::Future;

/// Storage key holding the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Async trait for persisting small string values under well-known keys.
pub trait TokenStorage {
    fn get(&self, key: &str) -> impl Future<Output = Option<String>>;
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>>;
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>>;
}

/// Reject keys that could escape a storage directory or are empty.
pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
