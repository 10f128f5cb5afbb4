//! Failures that escape a handler.

use super::templates::RenderError;
use crate::conversation::ports::SessionStoreError;
use crate::directory::ports::DirectoryError;
use crate::meeting::services::MeetingLogError;
use crate::task::services::TaskLifecycleError;
use thiserror::Error;

/// Unexpected failure while handling one event.
///
/// Expected outcomes such as a missing task or an expired proposal are
/// reported through [`super::Effect`] instead.
#[derive(Debug, Clone, Error)]
pub enum ConversationError {
    /// Task lifecycle failure.
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),
    /// Directory lookup failure.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// Meeting log failure.
    #[error(transparent)]
    Meetings(#[from] MeetingLogError),
    /// Session store failure.
    #[error(transparent)]
    Session(#[from] SessionStoreError),
    /// Template rendering failure.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for handlers.
pub type HandlerResult<T> = Result<T, ConversationError>;
