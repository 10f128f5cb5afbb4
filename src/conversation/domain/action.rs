//! Typed button actions and their colon-delimited wire form.
//!
//! Payloads are decoded once at the router boundary; handlers only ever
//! see [`CallbackAction`].

use crate::directory::domain::ExternalUserId;
use crate::task::domain::{MessageId, TaskId, TaskStatus};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Status change requested from a task card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    /// Move to `DOING`.
    Start,
    /// Move to `DONE`.
    Done,
    /// Block with the default reason.
    Block,
    /// Move a finished task back to `TODO`.
    Reopen,
}

impl TaskAction {
    /// Returns the wire token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Done => "done",
            Self::Block => "block",
            Self::Reopen => "reopen",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "start" => Some(Self::Start),
            "done" => Some(Self::Done),
            "block" => Some(Self::Block),
            "reopen" => Some(Self::Reopen),
            _ => None,
        }
    }
}

/// Filter applied to the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListFilter {
    /// Every task.
    All,
    /// Tasks in one status.
    Status(TaskStatus),
    /// Tasks assigned to the caller.
    Mine,
    /// Re-render the unfiltered list.
    Refresh,
}

impl ListFilter {
    /// Returns the wire token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Status(status) => status.as_str(),
            Self::Mine => "mine",
            Self::Refresh => "refresh",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "all" => Some(Self::All),
            "mine" => Some(Self::Mine),
            "refresh" => Some(Self::Refresh),
            other => TaskStatus::try_from(other).ok().map(Self::Status),
        }
    }
}

/// Entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItem {
    /// Start the creation dialog.
    Task,
    /// Show the task list.
    Tasks,
    /// Weekly board.
    Week,
    /// Record a meeting.
    Meeting,
    /// Recent meetings.
    Meetings,
    /// Weekly digest.
    Digest,
    /// Overdue tasks.
    Overdue,
}

impl MenuItem {
    /// Returns the wire token, which is also the matching command name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Tasks => "tasks",
            Self::Week => "week",
            Self::Meeting => "meeting",
            Self::Meetings => "meetings",
            Self::Digest => "digest",
            Self::Overdue => "overdue",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "task" => Some(Self::Task),
            "tasks" => Some(Self::Tasks),
            "week" => Some(Self::Week),
            "meeting" => Some(Self::Meeting),
            "meetings" => Some(Self::Meetings),
            "digest" => Some(Self::Digest),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

/// Decoded button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackAction {
    /// `task:<id>:<action>`
    Task {
        /// Target task.
        task_id: TaskId,
        /// Requested change.
        action: TaskAction,
    },
    /// `assign:<id>:<user>[:self]`
    Assign {
        /// Target task.
        task_id: TaskId,
        /// Participant offered by the button.
        user_id: ExternalUserId,
        /// Whether the presser claims the task for themselves.
        claim: bool,
    },
    /// `assign_menu:<id>`
    AssignMenu(TaskId),
    /// `assign_skip:<id>`
    AssignSkip(TaskId),
    /// `tasks:<filter>`
    TaskList(ListFilter),
    /// `confirm_task:<message id>`
    ConfirmProposal(MessageId),
    /// `cancel_task:<message id>`
    CancelProposal(MessageId),
    /// `menu:<item>`
    Menu(MenuItem),
}

/// Reasons a payload could not be decoded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallbackDecodeError {
    /// Empty payload or empty segment.
    #[error("malformed callback payload: {0:?}")]
    Malformed(String),
    /// The namespace is not recognised.
    #[error("unknown callback namespace: {0}")]
    UnknownNamespace(String),
    /// Too few or too many arguments for the namespace.
    #[error("{namespace} expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        /// Namespace being decoded.
        namespace: String,
        /// Accepted argument counts.
        expected: &'static str,
        /// Supplied argument count.
        actual: usize,
    },
    /// An argument failed to parse.
    #[error("invalid {namespace} argument: {value:?}")]
    InvalidArgument {
        /// Namespace being decoded.
        namespace: String,
        /// Offending argument.
        value: String,
    },
}

impl CallbackAction {
    /// Decodes a `namespace:arg[:arg]` payload.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackDecodeError`] for empty or unknown payloads, wrong
    /// argument counts and unparsable arguments.
    pub fn decode(data: &str) -> Result<Self, CallbackDecodeError> {
        let segments: Vec<&str> = data.split(':').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(CallbackDecodeError::Malformed(data.to_owned()));
        }
        let Some((&namespace, args)) = segments.split_first() else {
            return Err(CallbackDecodeError::Malformed(data.to_owned()));
        };
        let decoder = ArgumentDecoder { namespace, args };

        match namespace {
            "task" => {
                decoder.expect_count(&[2], "2")?;
                Ok(Self::Task {
                    task_id: decoder.task_id(0)?,
                    action: decoder.parse_with(1, TaskAction::parse)?,
                })
            }
            "assign" => {
                decoder.expect_count(&[2, 3], "2 or 3")?;
                let claim = match args.get(2) {
                    None => false,
                    Some(&"self") => true,
                    Some(_) => return Err(decoder.invalid(2)),
                };
                Ok(Self::Assign {
                    task_id: decoder.task_id(0)?,
                    user_id: decoder.parse_with(1, |token| {
                        token.parse::<i64>().ok().map(ExternalUserId::new)
                    })?,
                    claim,
                })
            }
            "assign_menu" => {
                decoder.expect_count(&[1], "1")?;
                Ok(Self::AssignMenu(decoder.task_id(0)?))
            }
            "assign_skip" => {
                decoder.expect_count(&[1], "1")?;
                Ok(Self::AssignSkip(decoder.task_id(0)?))
            }
            "tasks" => {
                decoder.expect_count(&[1], "1")?;
                Ok(Self::TaskList(decoder.parse_with(0, ListFilter::parse)?))
            }
            "confirm_task" => {
                decoder.expect_count(&[1], "1")?;
                Ok(Self::ConfirmProposal(decoder.message_id(0)?))
            }
            "cancel_task" => {
                decoder.expect_count(&[1], "1")?;
                Ok(Self::CancelProposal(decoder.message_id(0)?))
            }
            "menu" => {
                decoder.expect_count(&[1], "1")?;
                Ok(Self::Menu(decoder.parse_with(0, MenuItem::parse)?))
            }
            other => Err(CallbackDecodeError::UnknownNamespace(other.to_owned())),
        }
    }

    /// Encodes the action in its wire form.
    ///
    /// Task identifiers use the 32-character hex form to stay within the
    /// transport's payload limit.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Task { task_id, action } => {
                format!("task:{}:{}", compact(*task_id), action.as_str())
            }
            Self::Assign {
                task_id,
                user_id,
                claim,
            } => {
                let suffix = if *claim { ":self" } else { "" };
                format!("assign:{}:{user_id}{suffix}", compact(*task_id))
            }
            Self::AssignMenu(task_id) => format!("assign_menu:{}", compact(*task_id)),
            Self::AssignSkip(task_id) => format!("assign_skip:{}", compact(*task_id)),
            Self::TaskList(filter) => format!("tasks:{}", filter.as_str()),
            Self::ConfirmProposal(message_id) => format!("confirm_task:{message_id}"),
            Self::CancelProposal(message_id) => format!("cancel_task:{message_id}"),
            Self::Menu(item) => format!("menu:{}", item.as_str()),
        }
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for CallbackAction {
    type Err = CallbackDecodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::decode(value)
    }
}

fn compact(task_id: TaskId) -> String {
    task_id.into_inner().simple().to_string()
}

struct ArgumentDecoder<'a> {
    namespace: &'a str,
    args: &'a [&'a str],
}

impl ArgumentDecoder<'_> {
    fn expect_count(
        &self,
        accepted: &[usize],
        expected: &'static str,
    ) -> Result<(), CallbackDecodeError> {
        if accepted.contains(&self.args.len()) {
            return Ok(());
        }
        Err(CallbackDecodeError::ArgumentCount {
            namespace: self.namespace.to_owned(),
            expected,
            actual: self.args.len(),
        })
    }

    fn invalid(&self, index: usize) -> CallbackDecodeError {
        CallbackDecodeError::InvalidArgument {
            namespace: self.namespace.to_owned(),
            value: self.args.get(index).copied().unwrap_or_default().to_owned(),
        }
    }

    fn parse_with<T>(
        &self,
        index: usize,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, CallbackDecodeError> {
        self.args
            .get(index)
            .and_then(|token| parse(token))
            .ok_or_else(|| self.invalid(index))
    }

    fn task_id(&self, index: usize) -> Result<TaskId, CallbackDecodeError> {
        self.parse_with(index, |token| token.parse::<TaskId>().ok())
    }

    fn message_id(&self, index: usize) -> Result<MessageId, CallbackDecodeError> {
        self.parse_with(index, |token| token.parse::<i64>().ok().map(MessageId::new))
    }
}
