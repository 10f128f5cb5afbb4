//! Diesel row models for participant persistence.

use super::schema::chat_users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for participants.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = chat_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatUserRow {
    /// Internal identifier.
    pub id: uuid::Uuid,
    /// Transport identity.
    pub external_id: i64,
    /// Public handle.
    pub username: Option<String>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
    /// Soft-deactivation flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for participants.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_users)]
pub struct NewChatUserRow {
    /// Internal identifier.
    pub id: uuid::Uuid,
    /// Transport identity.
    pub external_id: i64,
    /// Public handle.
    pub username: Option<String>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
    /// Soft-deactivation flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
