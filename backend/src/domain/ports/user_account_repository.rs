//! Port abstraction for persisting accounts that can sign in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;
use crate::domain::{EmailAddress, UserId};

define_port_error! {
    /// Persistence errors raised by account adapters.
    pub enum UserAccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user account repository query failed: {message}",
        /// Another account already uses the email address.
        Duplicate => "an account with this email already exists",
    }
}

/// Stored account. `password_hash` is a PHC string and never leaves the
/// account service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Values needed to create an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: String,
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    /// Store a new account; fails with `Duplicate` when the email is taken.
    async fn insert(&self, account: &NewUserAccount) -> Result<UserAccount, UserAccountRepositoryError>;

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError>;
}

/// Fixture repository with no accounts that rejects signups.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUserAccountRepository;

#[async_trait]
impl UserAccountRepository for FixtureUserAccountRepository {
    async fn insert(&self, _account: &NewUserAccount) -> Result<UserAccount, UserAccountRepositoryError> {
        Err(UserAccountRepositoryError::connection("no account store configured"))
    }

    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_knows_nobody_and_rejects_signups() {
        let repo = FixtureUserAccountRepository;
        let email = EmailAddress::new("ada@example.com").expect("valid email");

        assert_eq!(repo.find_by_email(&email).await.expect("lookup"), None);
        let account = NewUserAccount {
            id: UserId::random(),
            email,
            name: "Ada".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
        };
        assert!(matches!(
            repo.insert(&account).await,
            Err(UserAccountRepositoryError::Connection { .. })
        ));
    }
}
