//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{tickets, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_secret: String,
    pub admin_status: bool,
    #[expect(dead_code, reason = "audit column, not exposed through the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_secret: &'a str,
    pub admin_status: bool,
}

/// Changeset struct for updating existing user records. `None` fields are
/// left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub email: Option<&'a str>,
    pub password_secret: Option<&'a str>,
    pub admin_status: Option<bool>,
}

/// Row struct for reading from the tickets table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketRow {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub status: String,
    #[expect(dead_code, reason = "audit column, not exposed through the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new ticket records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tickets)]
pub(crate) struct NewTicketRow<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'a str,
}
