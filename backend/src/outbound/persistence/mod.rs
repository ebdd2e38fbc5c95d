//! PostgreSQL persistence for favourite locations and user accounts.
//!
//! Diesel row structs and table definitions stay private to this module; the
//! repository translates them into domain types. Connections come from a bb8
//! pool of `diesel-async` connections.

mod diesel_error_mapping;
mod diesel_favourite_location_repository;
mod diesel_user_account_repository;
mod models;
mod pool;
mod schema;

pub use diesel_favourite_location_repository::DieselFavouriteLocationRepository;
pub use diesel_user_account_repository::DieselUserAccountRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
