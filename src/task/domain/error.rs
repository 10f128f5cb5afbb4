//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The title exceeds the persisted column width.
    #[error("task title is {length} characters, at most {max} allowed")]
    TitleTooLong {
        /// Length of the rejected title in characters.
        length: usize,
        /// Maximum permitted length.
        max: usize,
    },

    /// The blocker reason is empty after trimming.
    #[error("blocker reason must not be empty")]
    EmptyBlockerReason,

    /// The transition policy forbids the requested status change.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Task being changed.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
