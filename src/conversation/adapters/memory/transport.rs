//! Transport that records deliveries instead of talking to a chat service.

use crate::conversation::domain::Reply;
use crate::conversation::ports::{
    ChatTransport, TransportError, TransportOperation, TransportResult,
};
use crate::task::domain::{ChatId, MessageId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A delivered transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    /// A posted message.
    Send {
        /// Target chat.
        chat_id: ChatId,
        /// Identifier assigned to the message.
        message_id: MessageId,
        /// Content.
        reply: Reply,
    },
    /// An edited message.
    Edit {
        /// Target chat.
        chat_id: ChatId,
        /// Edited message.
        message_id: MessageId,
        /// New content.
        reply: Reply,
    },
    /// A deleted message.
    Delete {
        /// Target chat.
        chat_id: ChatId,
        /// Deleted message.
        message_id: MessageId,
    },
    /// An acknowledged button press.
    Answer {
        /// Acknowledged query.
        query_id: String,
        /// Optional notice.
        text: Option<String>,
    },
}

impl TransportCall {
    /// Returns the operation this call performed.
    #[must_use]
    pub const fn operation(&self) -> TransportOperation {
        match self {
            Self::Send { .. } => TransportOperation::Send,
            Self::Edit { .. } => TransportOperation::Edit,
            Self::Delete { .. } => TransportOperation::Delete,
            Self::Answer { .. } => TransportOperation::Answer,
        }
    }

    /// Returns the text carried by the call, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Send { reply, .. } | Self::Edit { reply, .. } => Some(reply.text.as_str()),
            Self::Answer { text, .. } => text.as_deref(),
            Self::Delete { .. } => None,
        }
    }

    /// Returns the reply carried by a send or edit.
    #[must_use]
    pub const fn reply(&self) -> Option<&Reply> {
        match self {
            Self::Send { reply, .. } | Self::Edit { reply, .. } => Some(reply),
            Self::Delete { .. } | Self::Answer { .. } => None,
        }
    }
}

/// In-memory transport that records successful calls.
///
/// Operations can be made to fail with [`Self::fail`], which mimics
/// expired interactions and deleted messages.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<TransportCall>>>,
    failures: Arc<Mutex<HashMap<TransportOperation, TransportError>>>,
    next_message_id: Arc<AtomicI64>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            failures: Arc::default(),
            next_message_id: Arc::new(AtomicI64::new(1_000)),
        }
    }
}

impl RecordingTransport {
    /// Creates a transport with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `operation` fail with `error`.
    pub fn fail(&self, operation: TransportOperation, error: TransportError) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(operation, error);
    }

    /// Lets `operation` succeed again.
    pub fn recover(&self, operation: TransportOperation) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&operation);
    }

    /// Returns the delivered calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forgets recorded calls.
    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn check(&self, operation: TransportOperation) -> TransportResult<()> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&operation)
            .cloned()
            .map_or(Ok(()), Err)
    }

    fn record(&self, call: TransportCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_message(&self, chat_id: ChatId, reply: &Reply) -> TransportResult<MessageId> {
        self.check(TransportOperation::Send)?;
        let message_id = MessageId::new(self.next_message_id.fetch_add(1, Ordering::Relaxed));
        self.record(TransportCall::Send {
            chat_id,
            message_id,
            reply: reply.clone(),
        });
        Ok(message_id)
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        reply: &Reply,
    ) -> TransportResult<()> {
        self.check(TransportOperation::Edit)?;
        self.record(TransportCall::Edit {
            chat_id,
            message_id,
            reply: reply.clone(),
        });
        Ok(())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> TransportResult<()> {
        self.check(TransportOperation::Delete)?;
        self.record(TransportCall::Delete {
            chat_id,
            message_id,
        });
        Ok(())
    }

    async fn answer_callback(&self, query_id: &str, text: Option<&str>) -> TransportResult<()> {
        self.check(TransportOperation::Answer)?;
        self.record(TransportCall::Answer {
            query_id: query_id.to_owned(),
            text: text.map(str::to_owned),
        });
        Ok(())
    }
}
