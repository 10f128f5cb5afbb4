//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Assigned directory record; cleared when the record is removed.
        assignee_id -> Nullable<Uuid>,
        /// Denormalised assignee transport identity.
        assignee_external_id -> Nullable<Int8>,
        /// Denormalised assignee display name.
        #[max_length = 100]
        assignee_name -> Nullable<Varchar>,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Origin payload.
        origin -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blockers owned by tasks.
    blockers (id) {
        /// Blocker identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Reason text.
        reason -> Text,
        /// Transport identity of the participant who recorded it.
        created_by -> Nullable<Int8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(blockers -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, blockers);
