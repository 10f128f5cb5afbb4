//! Keyed short-lived state: dialog sessions and pending proposals.

use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;
use thiserror::Error;

/// Result type for session store operations.
pub type SessionResult<T> = Result<T, SessionStoreError>;

/// Best-effort keyed store with optional expiry.
///
/// Entries may vanish on restart or expiry; callers treat absence as the
/// idle state. Concurrent access to different keys never interferes.
#[async_trait]
pub trait SessionStore<K, V>: Send + Sync
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Returns the live value for `key`.
    async fn get(&self, key: &K) -> SessionResult<Option<V>>;

    /// Stores `value`, replacing any previous one; `ttl` of `None` never
    /// expires.
    async fn set(&self, key: K, value: V, ttl: Option<Duration>) -> SessionResult<()>;

    /// Removes and returns the live value, so at most one caller gets it.
    async fn take(&self, key: &K) -> SessionResult<Option<V>>;

    /// Removes the value; returns whether a live one was present.
    async fn delete(&self, key: &K) -> SessionResult<bool>;
}

/// Errors returned by session stores.
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    /// The backing store could not be reached.
    #[error("session store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl SessionStoreError {
    /// Wraps a backend error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
