//! Diesel schema for the meeting log.

diesel::table! {
    /// Recorded meetings.
    meetings (id) {
        /// Meeting identifier.
        id -> Uuid,
        /// Summary text.
        summary -> Text,
        /// Transport identity of the participant who recorded it.
        recorded_by -> Nullable<Int8>,
        /// When the meeting took place.
        held_at -> Timestamptz,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}
