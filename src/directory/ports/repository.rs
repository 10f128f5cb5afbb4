//! Repository port for participant persistence.

use crate::directory::domain::{ChatUser, ExternalUserId, UserProfile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Participant persistence contract.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a participant by transport identity, active or not.
    async fn find_by_external_id(
        &self,
        external_id: ExternalUserId,
    ) -> DirectoryResult<Option<ChatUser>>;

    /// Lists active participants ordered by first name.
    async fn list_active(&self) -> DirectoryResult<Vec<ChatUser>>;

    /// Creates the participant or refreshes its names in one atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the store fails.
    async fn upsert(
        &self,
        profile: UserProfile,
        seen_at: DateTime<Utc>,
    ) -> DirectoryResult<ChatUser>;

    /// Soft-deactivates a participant.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when no participant has the
    /// given identity.
    async fn deactivate(
        &self,
        external_id: ExternalUserId,
        at: DateTime<Utc>,
    ) -> DirectoryResult<ChatUser>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The participant was not found.
    #[error("chat user not found: {0}")]
    NotFound(ExternalUserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
