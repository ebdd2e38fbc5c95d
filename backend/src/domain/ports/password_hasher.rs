//! Driven port for one-way password hashing.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Password;

define_port_error! {
    /// Failures of the hashing backend. A wrong password is not an error.
    pub enum PasswordHasherError {
        /// The backend could not hash the password.
        Hashing { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt into a self-describing string.
    async fn hash(&self, password: &Password) -> Result<String, PasswordHasherError>;

    /// Whether `password` matches `stored_hash`.
    async fn verify(
        &self,
        password: &Password,
        stored_hash: &str,
    ) -> Result<bool, PasswordHasherError>;
}
