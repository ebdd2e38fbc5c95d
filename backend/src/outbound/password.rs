//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashing is CPU bound, so both operations run on Tokio's blocking pool.
//! Hashes are PHC strings carrying their own salt and parameters.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::Password;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Argon2id hasher.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Hasher with explicit cost parameters. [`Default`] uses the library's
    /// recommended parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

fn join_error(err: task::JoinError) -> PasswordHasherError {
    PasswordHasherError::hashing(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<String, PasswordHasherError> {
        let argon2 = self.argon2.clone();
        let password = Zeroizing::new(password.expose().to_owned());
        task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| PasswordHasherError::hashing(err.to_string()))
        })
        .await
        .map_err(join_error)?
    }

    async fn verify(
        &self,
        password: &Password,
        stored_hash: &str,
    ) -> Result<bool, PasswordHasherError> {
        let argon2 = self.argon2.clone();
        let password = Zeroizing::new(password.expose().to_owned());
        let stored_hash = stored_hash.to_owned();
        task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&stored_hash)
                .map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
            match argon2.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(err) => Err(PasswordHasherError::hashing(err.to_string())),
            }
        })
        .await
        .map_err(join_error)?
    }
}
