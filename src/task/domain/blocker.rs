//! Blockers recorded against a task.

use super::{BlockerId, TaskDomainError};
use crate::directory::domain::ExternalUserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason a task cannot progress. Appended, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocker {
    id: BlockerId,
    reason: String,
    created_by: Option<ExternalUserId>,
    created_at: DateTime<Utc>,
}

impl Blocker {
    /// Creates a blocker with a validated reason.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyBlockerReason`] when the reason is
    /// blank.
    pub fn new(
        reason: impl Into<String>,
        created_by: Option<ExternalUserId>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskDomainError> {
        let raw = reason.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyBlockerReason);
        }
        Ok(Self {
            id: BlockerId::new(),
            reason: trimmed.to_owned(),
            created_by,
            created_at,
        })
    }

    /// Reconstructs a blocker from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: BlockerId,
        reason: String,
        created_by: Option<ExternalUserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            reason,
            created_by,
            created_at,
        }
    }

    /// Returns the blocker identifier.
    #[must_use]
    pub const fn id(&self) -> BlockerId {
        self.id
    }

    /// Returns the reason text.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns who recorded the blocker.
    #[must_use]
    pub const fn created_by(&self) -> Option<ExternalUserId> {
        self.created_by
    }

    /// Returns when the blocker was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
