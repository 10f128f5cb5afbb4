//! In-memory meeting log.

use crate::meeting::{
    domain::Meeting,
    ports::{MeetingRepository, MeetingRepositoryError, MeetingRepositoryResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory meeting repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMeetingRepository {
    meetings: Arc<RwLock<Vec<Meeting>>>,
}

impl InMemoryMeetingRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> MeetingRepositoryError {
    MeetingRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl MeetingRepository for InMemoryMeetingRepository {
    async fn store(&self, meeting: &Meeting) -> MeetingRepositoryResult<()> {
        let mut meetings = self.meetings.write().map_err(lock_error)?;
        if meetings.iter().any(|stored| stored.id() == meeting.id()) {
            return Err(MeetingRepositoryError::DuplicateMeeting(meeting.id()));
        }
        meetings.push(meeting.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> MeetingRepositoryResult<Vec<Meeting>> {
        let meetings = self.meetings.read().map_err(lock_error)?;
        let mut sorted = meetings.clone();
        sorted.sort_by(|left, right| right.held_at().cmp(&left.held_at()));
        sorted.truncate(limit);
        Ok(sorted)
    }
}
