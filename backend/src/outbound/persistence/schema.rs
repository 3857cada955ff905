//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// User accounts. `email` carries a unique constraint; duplicate inserts
    /// surface as a unique violation and never mutate the table.
    users (id) {
        /// Primary key, serial.
        id -> Int4,
        /// Required display name.
        name -> Varchar,
        /// Login email, globally unique.
        email -> Varchar,
        /// One-way password secret (PHC string).
        password_secret -> Varchar,
        /// Admin flag, defaults to false.
        admin_status -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Support tickets. `user_id` is a weak reference: no foreign key, no
    /// cascade on user deletion.
    tickets (id) {
        /// Primary key, serial.
        id -> Int4,
        /// Owning user at creation time.
        user_id -> Int4,
        title -> Varchar,
        description -> Text,
        /// Free-form status text, defaults to "new".
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}
