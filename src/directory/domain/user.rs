//! Chat participant aggregate.

use super::{ChatUserId, ExternalUserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile fields reported by the transport for a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Transport-assigned identity.
    pub external_id: ExternalUserId,
    /// First name; always present.
    pub first_name: String,
    /// Public handle without the leading `@`.
    pub username: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
}

impl UserProfile {
    /// Creates a profile with only the required fields.
    #[must_use]
    pub fn new(external_id: ExternalUserId, first_name: impl Into<String>) -> Self {
        Self {
            external_id,
            first_name: first_name.into(),
            username: None,
            last_name: None,
        }
    }

    /// Sets the public handle.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }
}

/// A participant known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    id: ChatUserId,
    external_id: ExternalUserId,
    username: Option<String>,
    first_name: String,
    last_name: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedChatUser {
    /// Internal identifier.
    pub id: ChatUserId,
    /// Transport identity.
    pub external_id: ExternalUserId,
    /// Public handle.
    pub username: Option<String>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
    /// Whether the participant is active.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ChatUser {
    /// Registers a participant seen for the first time.
    #[must_use]
    pub fn register(profile: UserProfile, seen_at: DateTime<Utc>) -> Self {
        Self {
            id: ChatUserId::new(),
            external_id: profile.external_id,
            username: non_blank(profile.username),
            first_name: profile.first_name,
            last_name: non_blank(profile.last_name),
            is_active: true,
            created_at: seen_at,
            updated_at: seen_at,
        }
    }

    /// Reconstructs a participant from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedChatUser) -> Self {
        Self {
            id: data.id,
            external_id: data.external_id,
            username: data.username,
            first_name: data.first_name,
            last_name: data.last_name,
            is_active: data.is_active,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the internal identifier.
    #[must_use]
    pub const fn id(&self) -> ChatUserId {
        self.id
    }

    /// Returns the transport identity.
    #[must_use]
    pub const fn external_id(&self) -> ExternalUserId {
        self.external_id
    }

    /// Returns the public handle, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name, if any.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Returns whether the participant is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the name shown to other participants.
    ///
    /// Uses `@handle` when available, then `first last`, then `first`.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(username) = &self.username {
            return format!("@{username}");
        }
        match &self.last_name {
            Some(last_name) => format!("{} {last_name}", self.first_name),
            None => self.first_name.clone(),
        }
    }

    /// Refreshes names from a newer profile.
    ///
    /// The active flag is left untouched: a deactivated participant stays
    /// deactivated until an operator reactivates them.
    pub fn apply_profile(&mut self, profile: UserProfile, seen_at: DateTime<Utc>) {
        self.first_name = profile.first_name;
        self.username = non_blank(profile.username);
        self.last_name = non_blank(profile.last_name);
        self.updated_at = seen_at;
    }

    /// Soft-deactivates the participant.
    pub fn deactivate(&mut self, at: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = at;
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
