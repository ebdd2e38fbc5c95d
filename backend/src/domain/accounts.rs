//! Signup and login for the accounts that own favourite locations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::ports::{
    NewUserAccount, PasswordHasher, PasswordHasherError, UserAccount, UserAccountRepository,
    UserAccountRepositoryError,
};
use super::{EmailAddress, Error, LoginCredentials, SignupDetails, UserId};

const EMAIL_TAKEN: &str = "Email is already registered";
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: EmailAddress,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

impl From<UserAccount> for AccountProfile {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
        }
    }
}

/// Application service registering and authenticating accounts.
pub struct AccountService {
    accounts: Arc<dyn UserAccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn UserAccountRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { accounts, hasher }
    }

    /// Register a new account.
    ///
    /// Fails with `409 Email is already registered` when the email is taken,
    /// including when a concurrent signup wins the race.
    pub async fn signup(&self, details: &SignupDetails) -> Result<AccountProfile, Error> {
        const FAILED: &str = "Could not register account";

        let existing = self
            .accounts
            .find_by_email(details.email())
            .await
            .map_err(|err| map_repository_error(err, FAILED))?;
        if existing.is_some() {
            warn!(email = %details.email(), "signup for registered email");
            return Err(Error::conflict(EMAIL_TAKEN));
        }

        let password_hash = self
            .hasher
            .hash(details.password())
            .await
            .map_err(|err| map_hasher_error(&err, FAILED))?;
        let account = NewUserAccount {
            id: UserId::random(),
            email: details.email().clone(),
            name: details.name().to_owned(),
            password_hash,
        };

        let stored = self
            .accounts
            .insert(&account)
            .await
            .map_err(|err| match err {
                UserAccountRepositoryError::Duplicate => Error::conflict(EMAIL_TAKEN),
                other => map_repository_error(other, FAILED),
            })?;
        info!(user_id = %stored.id, "account registered");
        Ok(stored.into())
    }

    /// Check credentials and return the account's id.
    ///
    /// Unknown emails and wrong passwords fail alike with
    /// `401 Invalid email or password`.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        const FAILED: &str = "Could not log in";

        let account = self
            .accounts
            .find_by_email(credentials.email())
            .await
            .map_err(|err| map_repository_error(err, FAILED))?
            .ok_or_else(|| {
                warn!(email = %credentials.email(), "login for unknown email");
                Error::unauthorized(BAD_CREDENTIALS)
            })?;

        let matches = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .await
            .map_err(|err| map_hasher_error(&err, FAILED))?;
        if !matches {
            warn!(user_id = %account.id, "login with wrong password");
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        }
        Ok(account.id)
    }
}

fn map_repository_error(err: UserAccountRepositoryError, message: &str) -> Error {
    error!(error = %err, "user account repository failure");
    match err {
        UserAccountRepositoryError::Connection { .. } => Error::service_unavailable(message),
        _ => Error::internal(message),
    }
}

fn map_hasher_error(err: &PasswordHasherError, message: &str) -> Error {
    error!(error = %err, "password hasher failure");
    Error::internal(message)
}
