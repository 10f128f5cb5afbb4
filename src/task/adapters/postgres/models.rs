//! Diesel row models for task persistence.

use super::schema::{blockers, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Assigned directory record.
    pub assignee_id: Option<uuid::Uuid>,
    /// Assignee transport identity.
    pub assignee_external_id: Option<i64>,
    /// Assignee display name.
    pub assignee_name: Option<String>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Origin JSON payload.
    pub origin: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for task records.
///
/// `None` fields are written as `NULL` so clearing a value persists.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskRecord {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Assigned directory record.
    pub assignee_id: Option<uuid::Uuid>,
    /// Assignee transport identity.
    pub assignee_external_id: Option<i64>,
    /// Assignee display name.
    pub assignee_name: Option<String>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Origin JSON payload.
    pub origin: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for blockers, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = blockers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BlockerRow {
    /// Blocker identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Reason text.
    pub reason: String,
    /// Recorder's transport identity.
    pub created_by: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
