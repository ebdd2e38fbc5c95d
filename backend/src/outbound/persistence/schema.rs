//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Cities bookmarked by users.
    ///
    /// `(user_id, city)` is unique; `city` is indexed for the refresher's
    /// distinct scan.
    favourite_locations (id) {
        /// Primary key.
        id -> Int8,
        /// Owning user.
        user_id -> Uuid,
        /// City name exactly as submitted (max 60 characters).
        city -> Varchar,
        /// Bookmark creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Accounts that can sign in. `email` is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(favourite_locations -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(favourite_locations, users);
