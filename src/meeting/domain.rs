//! Domain model for recorded meetings.

use crate::directory::domain::ExternalUserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a meeting record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(Uuid);

impl MeetingId {
    /// Creates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for MeetingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors returned while recording a meeting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MeetingDomainError {
    /// The summary is empty after trimming.
    #[error("meeting summary must not be empty")]
    EmptySummary,
}

/// A meeting summary posted to the chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    id: MeetingId,
    summary: String,
    recorded_by: Option<ExternalUserId>,
    held_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl Meeting {
    /// Records a meeting held at `held_at`.
    ///
    /// # Errors
    ///
    /// Returns [`MeetingDomainError::EmptySummary`] for a blank summary.
    pub fn record(
        summary: impl Into<String>,
        recorded_by: Option<ExternalUserId>,
        held_at: DateTime<Utc>,
    ) -> Result<Self, MeetingDomainError> {
        let raw = summary.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MeetingDomainError::EmptySummary);
        }
        Ok(Self {
            id: MeetingId::new(),
            summary: trimmed.to_owned(),
            recorded_by,
            held_at,
            created_at: held_at,
        })
    }

    /// Reconstructs a meeting from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: MeetingId,
        summary: String,
        recorded_by: Option<ExternalUserId>,
        held_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            summary,
            recorded_by,
            held_at,
            created_at,
        }
    }

    /// Returns the meeting identifier.
    #[must_use]
    pub const fn id(&self) -> MeetingId {
        self.id
    }

    /// Returns the summary text.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns who recorded the meeting.
    #[must_use]
    pub const fn recorded_by(&self) -> Option<ExternalUserId> {
        self.recorded_by
    }

    /// Returns when the meeting took place.
    #[must_use]
    pub const fn held_at(&self) -> DateTime<Utc> {
        self.held_at
    }

    /// Returns when the record was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
