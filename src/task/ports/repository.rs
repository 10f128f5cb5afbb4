//! Repository port for task persistence and filtered listing.

use crate::directory::domain::ExternalUserId;
use crate::task::domain::{Task, TaskDomainError, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Optional constraints applied when listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks in this status.
    pub status: Option<TaskStatus>,
    /// Only tasks assigned to this participant.
    pub assignee: Option<ExternalUserId>,
    /// Only tasks created at or after this instant.
    pub created_since: Option<DateTime<Utc>>,
}

impl TaskFilter {
    /// Matches every task.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            status: None,
            assignee: None,
            created_since: None,
        }
    }

    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: ExternalUserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Restricts to tasks created at or after `since`.
    #[must_use]
    pub const fn created_since(mut self, since: DateTime<Utc>) -> Self {
        self.created_since = Some(since);
        self
    }

    /// Returns whether `task` satisfies every constraint.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self.assignee.is_none_or(|assignee| {
                task.assignee()
                    .is_some_and(|current| current.external_id == assignee)
            })
            && self
                .created_since
                .is_none_or(|since| task.created_at() >= since)
    }
}

/// In-place change applied to a freshly loaded task by
/// [`TaskRepository::modify`].
pub type TaskMutation = Box<dyn FnOnce(&mut Task) -> Result<(), TaskDomainError> + Send>;

/// Task persistence contract.
///
/// Each mutating call is one unit of work: it either commits every field
/// of the aggregate, blockers included, or leaves the stored task as it
/// was. Modifications of one task are serialised, so a change is always
/// applied to the latest committed state.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Loads a task, applies `mutation` and persists the result, appending
    /// new blockers, without letting another modification interleave.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::Rejected`] when `mutation` refuses the
    /// change; the stored task is untouched in both cases.
    async fn modify(&self, id: TaskId, mutation: TaskMutation) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching `filter`, newest first.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task together with its blockers.
    ///
    /// Returns `false` when the task did not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The requested change violates a domain rule.
    #[error(transparent)]
    Rejected(TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
