//! Diesel schema for user persistence.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// Unique chain-style address.
        #[max_length = 255]
        address -> Varchar,
        /// Display handle.
        #[max_length = 100]
        user_name -> Varchar,
        /// Contact email.
        #[max_length = 255]
        email -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Profiles owned one-to-one by users.
    profiles (user_id) {
        /// Owning user, deleted in cascade.
        user_id -> Uuid,
        /// First name.
        #[max_length = 100]
        first_name -> Varchar,
        /// Last name.
        #[max_length = 100]
        last_name -> Varchar,
    }
}

diesel::joinable!(profiles -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, profiles);
