//! Domain model for team tasks.
//!
//! The task aggregate owns its blockers and a denormalised copy of its
//! assignee. Status changes go through [`TransitionPolicy`] so the set of
//! permitted edges is explicit.

mod blocker;
mod error;
mod ids;
mod status;
mod task;

pub use blocker::Blocker;
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{BlockerId, ChatId, MessageId, TaskId};
pub use status::{TaskStatus, TransitionPolicy};
pub use task::{Assignee, NewTask, PersistedTaskData, Task, TaskOrigin, TaskTitle};
