//! Task-creation dialog state machine.
//!
//! Transitions are pure: each consumes the current session and returns the
//! next one, leaving storage to the caller.

use crate::directory::domain::ExternalUserId;
use crate::task::domain::{ChatId, TaskDomainError, TaskTitle};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Command name that skips the optional description.
pub const SKIP_COMMAND: &str = "skip";

/// Identity of one participant's dialog within one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    /// Chat the dialog runs in.
    pub chat_id: ChatId,
    /// Participant driving the dialog.
    pub user_id: ExternalUserId,
}

impl SessionKey {
    /// Creates a session key.
    #[must_use]
    pub const fn new(chat_id: ChatId, user_id: ExternalUserId) -> Self {
        Self { chat_id, user_id }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.user_id)
    }
}

/// Step of the creation dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogPhase {
    /// No dialog in progress.
    #[default]
    Idle,
    /// Waiting for the task title.
    AwaitingTitle,
    /// Waiting for the description or the skip command.
    AwaitingDescription,
}

impl DialogPhase {
    /// Returns whether a dialog is in progress.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Input accepted while awaiting the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionInput {
    /// Free-text description.
    Text(String),
    /// The skip command.
    Skip,
}

/// Fields collected by a finished dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogDraft {
    /// Validated title.
    pub title: String,
    /// Description, absent when skipped or blank.
    pub description: Option<String>,
}

/// Errors raised by dialog transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DialogError {
    /// The submitted title failed validation; the dialog stays put.
    #[error("invalid title: {0}")]
    InvalidTitle(#[source] TaskDomainError),
    /// The stored session lost its title before the final step.
    #[error("dialog scratch data is missing")]
    MissingScratch,
    /// The input does not belong to the current step.
    #[error("unexpected input in phase {0:?}")]
    OutOfPhase(DialogPhase),
}

/// Per-participant dialog state with its scratch data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSession {
    phase: DialogPhase,
    title: Option<String>,
}

impl DialogSession {
    /// A fresh dialog waiting for its title, with no scratch data.
    #[must_use]
    pub const fn start() -> Self {
        Self {
            phase: DialogPhase::AwaitingTitle,
            title: None,
        }
    }

    /// Rebuilds a session read back from a session store.
    #[must_use]
    pub const fn from_parts(phase: DialogPhase, title: Option<String>) -> Self {
        Self { phase, title }
    }

    /// Returns the current step.
    #[must_use]
    pub const fn phase(&self) -> DialogPhase {
        self.phase
    }

    /// Returns the collected title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Stores a title and advances to the description step.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::InvalidTitle`] for a blank or over-long
    /// title and [`DialogError::OutOfPhase`] outside the title step.
    pub fn submit_title(self, text: &str) -> Result<Self, DialogError> {
        if self.phase != DialogPhase::AwaitingTitle {
            return Err(DialogError::OutOfPhase(self.phase));
        }
        let title = TaskTitle::new(text).map_err(DialogError::InvalidTitle)?;
        Ok(Self {
            phase: DialogPhase::AwaitingDescription,
            title: Some(title.as_str().to_owned()),
        })
    }

    /// Finishes the dialog with a description or a skip.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::MissingScratch`] when no title was stored and
    /// [`DialogError::OutOfPhase`] outside the description step.
    pub fn complete(self, input: DescriptionInput) -> Result<DialogDraft, DialogError> {
        if self.phase != DialogPhase::AwaitingDescription {
            return Err(DialogError::OutOfPhase(self.phase));
        }
        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or(DialogError::MissingScratch)?;
        let description = match input {
            DescriptionInput::Text(text) => Some(text.trim().to_owned()),
            DescriptionInput::Skip => None,
        }
        .filter(|text| !text.is_empty());
        Ok(DialogDraft { title, description })
    }
}
