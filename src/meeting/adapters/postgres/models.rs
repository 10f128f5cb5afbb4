//! Diesel row model for the meeting log.

use super::schema::meetings;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for meetings, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = meetings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MeetingRow {
    /// Meeting identifier.
    pub id: uuid::Uuid,
    /// Summary text.
    pub summary: String,
    /// Recorder's transport identity.
    pub recorded_by: Option<i64>,
    /// When the meeting took place.
    pub held_at: DateTime<Utc>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}
