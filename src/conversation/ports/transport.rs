//! Outbound chat transport.

use crate::conversation::domain::Reply;
use crate::task::domain::{ChatId, MessageId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Result type for transport calls.
pub type TransportResult<T> = Result<T, TransportError>;

/// Kind of transport call, used to report feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportOperation {
    /// New message.
    Send,
    /// Replace an existing message.
    Edit,
    /// Remove a message.
    Delete,
    /// Acknowledge a button press.
    Answer,
}

impl fmt::Display for TransportOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Send => "send",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Answer => "answer",
        })
    }
}

/// Errors reported by the transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The interaction or message is too old or gone.
    #[error("expired: {0}")]
    Expired(String),
    /// The transport refused the request.
    #[error("rejected: {0}")]
    Rejected(String),
    /// The transport could not be reached.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// Chat transport used to deliver feedback.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Posts a message and returns its identifier.
    async fn send_message(&self, chat_id: ChatId, reply: &Reply) -> TransportResult<MessageId>;

    /// Replaces the text and keyboard of a message.
    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        reply: &Reply,
    ) -> TransportResult<()>;

    /// Deletes a message.
    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> TransportResult<()>;

    /// Acknowledges a button press, optionally with a short notice.
    async fn answer_callback(&self, query_id: &str, text: Option<&str>) -> TransportResult<()>;
}
