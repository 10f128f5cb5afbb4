//! Repository port for the meeting log.

use crate::meeting::domain::{Meeting, MeetingId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for meeting repository operations.
pub type MeetingRepositoryResult<T> = Result<T, MeetingRepositoryError>;

/// Meeting persistence contract.
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Stores a new meeting.
    ///
    /// # Errors
    ///
    /// Returns [`MeetingRepositoryError::DuplicateMeeting`] when the ID
    /// already exists.
    async fn store(&self, meeting: &Meeting) -> MeetingRepositoryResult<()>;

    /// Returns at most `limit` meetings, most recently held first.
    async fn recent(&self, limit: usize) -> MeetingRepositoryResult<Vec<Meeting>>;
}

/// Errors returned by meeting repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MeetingRepositoryError {
    /// A meeting with the same identifier already exists.
    #[error("duplicate meeting identifier: {0}")]
    DuplicateMeeting(MeetingId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MeetingRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
