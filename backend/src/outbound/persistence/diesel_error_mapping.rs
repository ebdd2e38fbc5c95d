//! Diesel and pool error mapping shared by the repositories.
//!
//! Each repository passes its own error constructors; unique violations get a
//! dedicated constructor because both tables enforce one.

use tracing::debug;

use super::pool::PoolError;

pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => connection(message),
    }
}

/// Constructors for the repository error a Diesel failure becomes.
pub(crate) struct DieselErrorKinds<Q, C, D> {
    pub query: Q,
    pub connection: C,
    pub duplicate: D,
}

pub(crate) fn map_diesel_error<E, Q, C, D>(
    error: diesel::result::Error,
    kinds: DieselErrorKinds<Q, C, D>,
) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
    D: FnOnce() -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    let DieselErrorKinds {
        query,
        connection,
        duplicate,
    } = kinds;
    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => duplicate(),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}
