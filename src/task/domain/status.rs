//! Task status and the permitted transitions between statuses.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    Doing,
    /// Finished.
    Done,
    /// Waiting on something outside the assignee's control.
    Blocked,
}

impl TaskStatus {
    /// All statuses in board order.
    pub const ALL: [Self; 4] = [Self::Todo, Self::Doing, Self::Blocked, Self::Done];

    /// Returns the canonical wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::Doing => "DOING",
            Self::Done => "DONE",
            Self::Blocked => "BLOCKED",
        }
    }

    /// Returns whether the strict table permits moving to `target`.
    ///
    /// Self-edges are never permitted; a blocked task gains further
    /// blockers through [`super::Task::block`] instead.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Todo, Self::Doing | Self::Done | Self::Blocked)
                | (Self::Doing, Self::Todo | Self::Done | Self::Blocked)
                | (Self::Blocked, Self::Todo | Self::Doing | Self::Done)
                | (Self::Done, Self::Todo)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "TODO" => Ok(Self::Todo),
            "DOING" => Ok(Self::Doing),
            "DONE" => Ok(Self::Done),
            "BLOCKED" => Ok(Self::Blocked),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Rule set applied to explicit status changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Only the edges of [`TaskStatus::can_transition_to`] are permitted.
    Strict,
    /// Any status may overwrite any other, including itself.
    #[default]
    Unrestricted,
}

impl TransitionPolicy {
    /// Returns whether the policy permits `from -> to`.
    #[must_use]
    pub const fn permits(self, from: TaskStatus, to: TaskStatus) -> bool {
        match self {
            Self::Strict => from.can_transition_to(to),
            Self::Unrestricted => true,
        }
    }

    /// Returns whether a task in `from` may be blocked.
    #[must_use]
    pub const fn permits_block(self, from: TaskStatus) -> bool {
        match self {
            Self::Strict => !matches!(from, TaskStatus::Done),
            Self::Unrestricted => true,
        }
    }
}
