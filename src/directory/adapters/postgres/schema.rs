//! Diesel schema for participant persistence.

diesel::table! {
    /// Participants observed by the bot.
    chat_users (id) {
        /// Internal identifier.
        id -> Uuid,
        /// Transport identity; unique.
        external_id -> Int8,
        /// Public handle.
        #[max_length = 100]
        username -> Nullable<Varchar>,
        /// First name.
        #[max_length = 100]
        first_name -> Varchar,
        /// Last name.
        #[max_length = 100]
        last_name -> Nullable<Varchar>,
        /// Soft-deactivation flag.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
