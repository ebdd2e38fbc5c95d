//! PostgreSQL-backed `UserAccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    NewUserAccount, UserAccount, UserAccountRepository, UserAccountRepositoryError,
};
use crate::domain::{EmailAddress, UserId};

use super::diesel_error_mapping::{self, DieselErrorKinds};
use super::models::{NewUserAccountRow, UserAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserAccountRepository` port.
#[derive(Clone)]
pub struct DieselUserAccountRepository {
    pool: DbPool,
}

impl DieselUserAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserAccountRepositoryError {
    diesel_error_mapping::map_pool_error(error, UserAccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserAccountRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        DieselErrorKinds {
            query: UserAccountRepositoryError::query,
            connection: UserAccountRepositoryError::connection,
            duplicate: UserAccountRepositoryError::duplicate,
        },
    )
}

fn row_to_account(row: UserAccountRow) -> Result<UserAccount, UserAccountRepositoryError> {
    let email = EmailAddress::new(&row.email).map_err(|err| {
        UserAccountRepositoryError::query(format!("invalid email in database: {err}"))
    })?;
    Ok(UserAccount {
        id: UserId::from_uuid(row.id),
        email,
        name: row.name,
        password_hash: row.password_hash,
        created_at: row.created_at,
    })
}

#[async_trait]
impl UserAccountRepository for DieselUserAccountRepository {
    async fn insert(&self, account: &NewUserAccount) -> Result<UserAccount, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserAccountRow {
            id: *account.id.as_uuid(),
            email: account.email.as_str(),
            name: account.name.as_str(),
            password_hash: account.password_hash.as_str(),
        };

        let row: UserAccountRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserAccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_account(row)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserAccountRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserAccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    fn taken_email_maps_to_duplicate() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint \"users_email_key\"".to_owned()),
        );

        assert_eq!(
            map_diesel_error(diesel_err),
            UserAccountRepositoryError::Duplicate
        );
    }

    #[rstest]
    fn pool_checkout_failure_is_a_connection_error() {
        let err = map_pool_error(PoolError::checkout("timed out"));

        assert!(matches!(err, UserAccountRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[rstest]
    fn row_converts_to_domain_account() {
        let id = Uuid::new_v4();
        let row = UserAccountRow {
            id,
            email: "ada@example.com".to_owned(),
            name: "Ada".to_owned(),
            password_hash: "$argon2id$v=19$stub".to_owned(),
            created_at: Utc::now(),
        };

        let account = row_to_account(row).expect("valid row");
        assert_eq!(account.id, UserId::from_uuid(id));
        assert_eq!(account.email.as_str(), "ada@example.com");
    }

    #[rstest]
    fn row_with_corrupt_email_is_a_query_error() {
        let row = UserAccountRow {
            id: Uuid::new_v4(),
            email: "not an email".to_owned(),
            name: "Ada".to_owned(),
            password_hash: String::new(),
            created_at: Utc::now(),
        };

        assert!(matches!(
            row_to_account(row),
            Err(UserAccountRepositoryError::Query { .. })
        ));
    }
}
