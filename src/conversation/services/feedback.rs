//! Best-effort delivery of user-visible feedback.
//!
//! State changes are committed before any feedback is attempted. Each
//! transport call then yields a [`Feedback`] entry; a dropped delivery is
//! logged and never turns into an error.

use crate::conversation::domain::{CallbackDecodeError, ProposalKey, Reply};
use crate::conversation::ports::{ChatTransport, TransportError, TransportOperation};
use crate::directory::domain::ExternalUserId;
use crate::meeting::domain::MeetingId;
use crate::task::domain::{ChatId, MessageId, TaskId, TaskStatus};
use tracing::warn;

/// Whether a transport call reached the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The transport accepted the call.
    Delivered,
    /// The transport refused the call; nothing was rolled back.
    Dropped(TransportError),
}

/// Result of one feedback transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// Attempted call.
    pub operation: TransportOperation,
    /// Its result.
    pub delivery: Delivery,
}

impl Feedback {
    /// Returns `true` when the call was delivered.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self.delivery, Delivery::Delivered)
    }
}

/// Committed effect of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// No handler acted.
    Ignored,
    /// Greeting, menu or help shown.
    MenuShown,
    /// Task list shown or refreshed.
    TaskListShown,
    /// Dialog (re)started at the title step.
    DialogStarted,
    /// Title accepted; waiting for the description.
    DialogAdvanced,
    /// Invalid title; the dialog stays at the title step.
    DialogReprompted,
    /// Dialog abandoned because its scratch data was gone.
    DialogAborted,
    /// A task was created.
    TaskCreated(TaskId),
    /// A keyword proposal was staged.
    ProposalStaged(ProposalKey),
    /// The proposal was already consumed or expired.
    ProposalExpired(ProposalKey),
    /// The proposal was discarded.
    ProposalCancelled(ProposalKey),
    /// A task's status or assignee changed.
    TaskUpdated {
        /// Changed task.
        task_id: TaskId,
        /// Status after the change.
        status: TaskStatus,
    },
    /// Assignment was skipped for a new task.
    AssignmentSkipped(TaskId),
    /// The assignee picker was shown.
    AssigneeMenuShown(TaskId),
    /// The assignee picker had nobody to offer.
    NoAssignees(TaskId),
    /// The referenced task does not exist.
    TaskNotFound(TaskId),
    /// The referenced participant is not in the directory.
    UserNotFound(ExternalUserId),
    /// The transition policy refused a status change.
    TransitionRejected {
        /// Task left unchanged.
        task_id: TaskId,
        /// Its status.
        from: TaskStatus,
        /// Refused target.
        to: TaskStatus,
    },
    /// The button payload could not be decoded.
    InvalidCallback(CallbackDecodeError),
    /// A planning report or usage hint was shown.
    ReportShown,
    /// A meeting was recorded.
    MeetingRecorded(MeetingId),
    /// An unexpected failure was reported to the user.
    Failed,
}

/// Committed effect plus the feedback delivered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// What changed.
    pub effect: Effect,
    /// Feedback calls in the order they were attempted.
    pub feedback: Vec<Feedback>,
}

impl Outcome {
    /// An outcome without feedback.
    #[must_use]
    pub const fn ignored() -> Self {
        Self {
            effect: Effect::Ignored,
            feedback: Vec::new(),
        }
    }

    /// Returns the feedback calls that were dropped.
    pub fn dropped(&self) -> impl Iterator<Item = &Feedback> {
        self.feedback.iter().filter(|entry| !entry.is_delivered())
    }
}

/// Collects feedback for one event, swallowing transport failures.
pub struct FeedbackLog<'a> {
    transport: &'a dyn ChatTransport,
    entries: Vec<Feedback>,
}

impl<'a> FeedbackLog<'a> {
    /// Creates an empty log writing through `transport`.
    #[must_use]
    pub fn new(transport: &'a dyn ChatTransport) -> Self {
        Self {
            transport,
            entries: Vec::new(),
        }
    }

    /// Posts a message; returns its identifier when delivered.
    pub async fn send(&mut self, chat_id: ChatId, reply: &Reply) -> Option<MessageId> {
        match self.transport.send_message(chat_id, reply).await {
            Ok(message_id) => {
                self.push(TransportOperation::Send, Ok(()));
                Some(message_id)
            }
            Err(err) => {
                warn!(chat_id = %chat_id, error = %err, "message send dropped");
                self.push(TransportOperation::Send, Err(err));
                None
            }
        }
    }

    /// Replaces a message.
    pub async fn edit(&mut self, chat_id: ChatId, message_id: MessageId, reply: &Reply) {
        let result = self.transport.edit_message(chat_id, message_id, reply).await;
        if let Err(err) = &result {
            warn!(
                chat_id = %chat_id,
                message_id = %message_id,
                error = %err,
                "message edit dropped"
            );
        }
        self.push(TransportOperation::Edit, result);
    }

    /// Deletes a message.
    pub async fn delete(&mut self, chat_id: ChatId, message_id: MessageId) {
        let result = self.transport.delete_message(chat_id, message_id).await;
        if let Err(err) = &result {
            warn!(
                chat_id = %chat_id,
                message_id = %message_id,
                error = %err,
                "message delete dropped"
            );
        }
        self.push(TransportOperation::Delete, result);
    }

    /// Acknowledges a button press.
    pub async fn answer(&mut self, query_id: &str, text: Option<&str>) {
        let result = self.transport.answer_callback(query_id, text).await;
        if let Err(err) = &result {
            warn!(query_id, error = %err, "callback answer dropped");
        }
        self.push(TransportOperation::Answer, result);
    }

    /// Returns the entries recorded so far.
    #[must_use]
    pub fn entries(&self) -> &[Feedback] {
        &self.entries
    }

    /// Closes the log with the committed effect.
    #[must_use]
    pub fn finish(self, effect: Effect) -> Outcome {
        Outcome {
            effect,
            feedback: self.entries,
        }
    }

    fn push(&mut self, operation: TransportOperation, result: Result<(), TransportError>) {
        let delivery = match result {
            Ok(()) => Delivery::Delivered,
            Err(err) => Delivery::Dropped(err),
        };
        self.entries.push(Feedback {
            operation,
            delivery,
        });
    }
}
