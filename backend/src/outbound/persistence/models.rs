//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{favourite_locations, users};

/// Row struct for reading from the favourite_locations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = favourite_locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FavouriteLocationRow {
    pub id: i64,
    pub user_id: Uuid,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for bookmarking a city.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favourite_locations)]
pub(crate) struct NewFavouriteLocationRow<'a> {
    pub user_id: Uuid,
    pub city: &'a str,
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserAccountRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for registering an account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserAccountRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
}
