//! In-memory participant directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{ChatUser, ExternalUserId, UserProfile},
    ports::{DirectoryError, DirectoryResult, UserDirectory},
};

/// Thread-safe in-memory directory keyed by transport identity.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<ExternalUserId, ChatUser>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of known participants, active or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` when no participant has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(err: impl ToString) -> DirectoryError {
    DirectoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_external_id(
        &self,
        external_id: ExternalUserId,
    ) -> DirectoryResult<Option<ChatUser>> {
        let users = self.users.read().map_err(lock_error)?;
        Ok(users.get(&external_id).cloned())
    }

    async fn list_active(&self) -> DirectoryResult<Vec<ChatUser>> {
        let users = self.users.read().map_err(lock_error)?;
        let mut active: Vec<ChatUser> = users
            .values()
            .filter(|user| user.is_active())
            .cloned()
            .collect();
        active.sort_by(|left, right| {
            left.first_name()
                .cmp(right.first_name())
                .then(left.external_id().cmp(&right.external_id()))
        });
        Ok(active)
    }

    async fn upsert(
        &self,
        profile: UserProfile,
        seen_at: DateTime<Utc>,
    ) -> DirectoryResult<ChatUser> {
        let mut users = self.users.write().map_err(lock_error)?;
        let user = users
            .entry(profile.external_id)
            .and_modify(|existing| existing.apply_profile(profile.clone(), seen_at))
            .or_insert_with(|| ChatUser::register(profile.clone(), seen_at));
        Ok(user.clone())
    }

    async fn deactivate(
        &self,
        external_id: ExternalUserId,
        at: DateTime<Utc>,
    ) -> DirectoryResult<ChatUser> {
        let mut users = self.users.write().map_err(lock_error)?;
        let user = users
            .get_mut(&external_id)
            .ok_or(DirectoryError::NotFound(external_id))?;
        user.deactivate(at);
        Ok(user.clone())
    }
}
