//! Per-chat serialisation of event handling.

use crate::task::domain::ChatId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Hands out one async lock per chat so events from one chat are handled
/// in arrival order while different chats proceed concurrently.
#[derive(Debug, Default)]
pub struct ChatLanes {
    lanes: Mutex<HashMap<ChatId, Arc<AsyncMutex<()>>>>,
}

impl ChatLanes {
    /// Creates an empty lane table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive use of the lane for `chat_id`.
    pub async fn enter(&self, chat_id: ChatId) -> OwnedMutexGuard<()> {
        let lane = {
            let mut lanes = self.lanes.lock().unwrap_or_else(PoisonError::into_inner);
            lanes.retain(|_, lane| Arc::strong_count(lane) > 1);
            Arc::clone(lanes.entry(chat_id).or_default())
        };
        lane.lock_owned().await
    }

    /// Number of chats with a lane currently held or awaited.
    #[must_use]
    pub fn active(&self) -> usize {
        self.lanes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|lane| Arc::strong_count(lane) > 1)
            .count()
    }
}
