//! Service layer for task creation, status changes, blocking, and assignment.
//!
//! Every mutating call hands the repository a closure that is applied to
//! the latest stored aggregate inside one unit of work. A failure anywhere
//! leaves the stored task untouched.

use crate::directory::domain::{ChatUser, ExternalUserId};
use crate::task::{
    domain::{
        Assignee, Blocker, NewTask, Task, TaskDomainError, TaskId, TaskOrigin, TaskStatus,
        TaskTitle, TransitionPolicy,
    },
    ports::{TaskFilter, TaskMutation, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    assignee: Option<Assignee>,
    due_date: Option<DateTime<Utc>>,
    origin: TaskOrigin,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, origin: TaskOrigin) -> Self {
        Self {
            title: title.into(),
            description: None,
            assignee: None,
            due_date: None,
            origin,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Assignee) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            TaskRepositoryError::Rejected(domain) => Self::Domain(domain),
            other => Self::Repository(other),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    repository: Arc<R>,
    clock: Arc<C>,
    policy: TransitionPolicy,
}

impl<R, C> Clone for TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized + 'static,
{
    /// Creates a lifecycle service that lets any status overwrite another.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            policy: TransitionPolicy::default(),
        }
    }

    /// Replaces the transition policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the transition policy in force.
    #[must_use]
    pub const fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Creates a task in [`TaskStatus::Todo`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the title is invalid and
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let draft = NewTask {
            title: TaskTitle::new(request.title)?,
            description: request.description,
            assignee: request.assignee,
            due_date: request.due_date,
            origin: request.origin,
        };
        let task = Task::new(draft, &*self.clock);
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), origin = ?task.origin(), "task created");
        Ok(task)
    }

    /// Retrieves a task, treating absence as an error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn get(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.find(id).await?.ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Looks up a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Lists tasks matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the query fails.
    pub async fn list(&self, filter: &TaskFilter) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list(filter).await?)
    }

    /// Moves a task to `target` as permitted by the service policy.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] when the edge is not permitted.
    pub async fn change_status(
        &self,
        id: TaskId,
        target: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        let policy = self.policy;
        let clock = Arc::clone(&self.clock);
        let mutation: TaskMutation = Box::new(move |task: &mut Task| {
            task.transition_to(target, policy, &*clock).map(drop)
        });
        let task = self.modify(id, mutation).await?;
        info!(task_id = %id, to = %target, "task status changed");
        Ok(task)
    }

    /// Blocks a task and records the reason in one unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] for a blank reason or a status the
    /// policy does not let block.
    pub async fn block(
        &self,
        id: TaskId,
        reason: impl Into<String> + Send,
        by: Option<ExternalUserId>,
    ) -> TaskLifecycleResult<Task> {
        let blocker = Blocker::new(reason, by, self.clock.utc())?;
        let policy = self.policy;
        let clock = Arc::clone(&self.clock);
        let mutation: TaskMutation =
            Box::new(move |task: &mut Task| task.block(blocker, policy, &*clock));
        let task = self.modify(id, mutation).await?;
        info!(task_id = %id, blockers = task.blockers().len(), "task blocked");
        Ok(task)
    }

    /// Assigns a task to a participant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks.
    pub async fn assign(&self, id: TaskId, user: &ChatUser) -> TaskLifecycleResult<Task> {
        let assignee = Assignee::from_user(user);
        let clock = Arc::clone(&self.clock);
        let task = self
            .modify(
                id,
                Box::new(move |task: &mut Task| {
                    task.assign(assignee, &*clock);
                    Ok(())
                }),
            )
            .await?;
        info!(task_id = %id, user_id = %user.external_id(), "task assigned");
        Ok(task)
    }

    /// Assigns a task and starts it when it had not been started.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks.
    pub async fn take(&self, id: TaskId, user: &ChatUser) -> TaskLifecycleResult<Task> {
        let assignee = Assignee::from_user(user);
        let clock = Arc::clone(&self.clock);
        let task = self
            .modify(
                id,
                Box::new(move |task: &mut Task| {
                    task.take(assignee, &*clock);
                    Ok(())
                }),
            )
            .await?;
        info!(
            task_id = %id,
            user_id = %user.external_id(),
            status = %task.status(),
            "task taken"
        );
        Ok(task)
    }

    /// Deletes a task and its blockers.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn delete(&self, id: TaskId) -> TaskLifecycleResult<()> {
        if !self.repository.delete(id).await? {
            return Err(TaskLifecycleError::NotFound(id));
        }
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    async fn modify(&self, id: TaskId, mutation: TaskMutation) -> TaskLifecycleResult<Task> {
        Ok(self.repository.modify(id, mutation).await?)
    }
}
