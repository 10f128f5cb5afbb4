//! Task aggregate root and related lifecycle types.

use super::{Blocker, ChatId, MessageId, TaskDomainError, TaskId, TaskStatus, TransitionPolicy};
use crate::directory::domain::{ChatUser, ChatUserId, ExternalUserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// How a task came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskOrigin {
    /// Created through the explicit creation dialog.
    ManualCommand,
    /// Created by confirming a keyword proposal.
    AutoDetected {
        /// Chat the triggering message was posted in.
        chat_id: ChatId,
        /// The triggering message.
        message_id: MessageId,
    },
}

/// Validated task title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Width of the persisted title column.
    pub const MAX_LENGTH: usize = 255;

    /// Creates a trimmed, non-empty title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for blank input and
    /// [`TaskDomainError::TitleTooLong`] when the trimmed title exceeds
    /// [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TaskDomainError::TitleTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Denormalised assignee kept on the task.
///
/// The display fields survive removal of the directory record, so the
/// reference to the record itself is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// Directory record, when it still exists.
    pub user_id: Option<ChatUserId>,
    /// Transport identity of the assignee.
    pub external_id: ExternalUserId,
    /// Display name at assignment time.
    pub display_name: String,
}

impl Assignee {
    /// Builds the assignee fields from a directory record.
    #[must_use]
    pub fn from_user(user: &ChatUser) -> Self {
        Self {
            user_id: Some(user.id()),
            external_id: user.external_id(),
            display_name: user.display_name(),
        }
    }
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Validated title.
    pub title: TaskTitle,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Optional initial assignee.
    pub assignee: Option<Assignee>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation origin.
    pub origin: TaskOrigin,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    assignee: Option<Assignee>,
    due_date: Option<DateTime<Utc>>,
    origin: TaskOrigin,
    blockers: Vec<Blocker>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted assignee fields.
    pub assignee: Option<Assignee>,
    /// Persisted due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted origin.
    pub origin: TaskOrigin,
    /// Persisted blockers in creation order.
    pub blockers: Vec<Blocker>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in [`TaskStatus::Todo`].
    #[must_use]
    pub fn new(draft: NewTask, clock: &(impl Clock + ?Sized)) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: draft.title,
            description: draft
                .description
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty()),
            status: TaskStatus::Todo,
            assignee: draft.assignee,
            due_date: draft.due_date,
            origin: draft.origin,
            blockers: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            assignee: data.assignee,
            due_date: data.due_date,
            origin: data.origin,
            blockers: data.blockers,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<&Assignee> {
        self.assignee.as_ref()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the task origin.
    #[must_use]
    pub const fn origin(&self) -> &TaskOrigin {
        &self.origin
    }

    /// Returns the blockers in the order they were recorded.
    #[must_use]
    pub fn blockers(&self) -> &[Blocker] {
        &self.blockers
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the task is unfinished and past its due date.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Done && self.due_date.is_some_and(|due| due < now)
    }

    /// Moves the task to `target` and returns the previous status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when `policy`
    /// forbids the edge.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        policy: TransitionPolicy,
        clock: &(impl Clock + ?Sized),
    ) -> Result<TaskStatus, TaskDomainError> {
        let previous = self.status;
        if !policy.permits(previous, target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: previous,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(previous)
    }

    /// Marks the task blocked and appends `blocker` as one change.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when `policy`
    /// forbids blocking from the current status.
    pub fn block(
        &mut self,
        blocker: Blocker,
        policy: TransitionPolicy,
        clock: &(impl Clock + ?Sized),
    ) -> Result<(), TaskDomainError> {
        if !policy.permits_block(self.status) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: TaskStatus::Blocked,
            });
        }
        self.status = TaskStatus::Blocked;
        self.blockers.push(blocker);
        self.touch(clock);
        Ok(())
    }

    /// Replaces the assignee fields together.
    pub fn assign(&mut self, assignee: Assignee, clock: &(impl Clock + ?Sized)) {
        self.assignee = Some(assignee);
        self.touch(clock);
    }

    /// Assigns the task and starts it if it had not been started.
    ///
    /// Only a task in [`TaskStatus::Todo`] moves to [`TaskStatus::Doing`];
    /// any other status is left as it was. Returns the prior status.
    pub fn take(&mut self, assignee: Assignee, clock: &(impl Clock + ?Sized)) -> TaskStatus {
        let previous = self.status;
        self.assign(assignee, clock);
        if previous == TaskStatus::Todo {
            self.status = TaskStatus::Doing;
        }
        previous
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &(impl Clock + ?Sized)) {
        self.updated_at = clock.utc();
    }
}
