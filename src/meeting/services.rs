//! Meeting log orchestration.

use crate::directory::domain::ExternalUserId;
use crate::meeting::{
    domain::{Meeting, MeetingDomainError},
    ports::{MeetingRepository, MeetingRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for the meeting log.
#[derive(Debug, Clone, Error)]
pub enum MeetingLogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] MeetingDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] MeetingRepositoryError),
}

/// Records meeting summaries and lists recent ones.
pub struct MeetingLogService<R, C>
where
    R: MeetingRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for MeetingLogService<R, C>
where
    R: MeetingRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> MeetingLogService<R, C>
where
    R: MeetingRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    /// Creates a meeting log service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Records a meeting held now.
    ///
    /// # Errors
    ///
    /// Returns [`MeetingLogError::Domain`] for a blank summary and
    /// [`MeetingLogError::Repository`] when persistence fails.
    pub async fn record(
        &self,
        summary: &str,
        recorded_by: Option<ExternalUserId>,
    ) -> Result<Meeting, MeetingLogError> {
        let meeting = Meeting::record(summary, recorded_by, self.clock.utc())?;
        self.repository.store(&meeting).await?;
        info!(meeting_id = %meeting.id(), "meeting recorded");
        Ok(meeting)
    }

    /// Returns at most `limit` meetings, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`MeetingLogError::Repository`] when the query fails.
    pub async fn recent(&self, limit: usize) -> Result<Vec<Meeting>, MeetingLogError> {
        Ok(self.repository.recent(limit).await?)
    }
}
