//! Account test doubles: an in-memory account store and a cheap hasher.

use std::sync::{Arc, Mutex};

use argon2::Params;
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    NewUserAccount, UserAccount, UserAccountRepository, UserAccountRepositoryError,
};
use crate::domain::{AccountService, EmailAddress};
use crate::outbound::password::Argon2PasswordHasher;

/// Argon2id with the smallest parameters the library accepts.
pub fn cheap_password_hasher() -> Argon2PasswordHasher {
    match Params::new(Params::MIN_M_COST, 1, 1, None) {
        Ok(params) => Argon2PasswordHasher::with_params(params),
        Err(error) => panic!("minimal argon2 parameters rejected: {error}"),
    }
}

/// Account service over an empty [`InMemoryUserAccounts`].
pub fn in_memory_account_service() -> Arc<AccountService> {
    Arc::new(AccountService::new(
        Arc::new(InMemoryUserAccounts::default()),
        Arc::new(cheap_password_hasher()),
    ))
}

/// Account store kept in memory; emails are unique like the database.
#[derive(Default)]
pub struct InMemoryUserAccounts {
    rows: Mutex<Vec<UserAccount>>,
}

impl InMemoryUserAccounts {
    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<UserAccount>> {
        match self.rows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl UserAccountRepository for InMemoryUserAccounts {
    async fn insert(&self, account: &NewUserAccount) -> Result<UserAccount, UserAccountRepositoryError> {
        let mut rows = self.rows();
        if rows.iter().any(|row| row.email == account.email) {
            return Err(UserAccountRepositoryError::duplicate());
        }
        let stored = UserAccount {
            id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            password_hash: account.password_hash.clone(),
            created_at: Utc::now(),
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        Ok(self.rows().iter().find(|row| row.email == *email).cloned())
    }
}
