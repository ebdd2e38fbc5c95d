//! Account credentials accepted by signup and login.
//!
//! Constructors validate raw strings before a handler talks to a service, so
//! the account service only ever sees well-formed input. Passwords are held in
//! [`Zeroizing`] buffers and never printed.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

pub const PASSWORD_MIN_CHARS: usize = 6;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const NAME_MAX_CHARS: usize = 100;

/// Validation failures for signup and login payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsValidationError {
    #[error("email must be a valid email address")]
    InvalidEmail,
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most 100 characters")]
    NameTooLong,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("password must not be empty")]
    EmptyPassword,
}

impl CredentialsValidationError {
    /// Payload field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::EmptyName | Self::NameTooLong => "name",
            Self::PasswordTooShort | Self::EmptyPassword => "password",
        }
    }

    /// Machine-readable detail code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::EmptyName => "empty_name",
            Self::NameTooLong => "name_too_long",
            Self::PasswordTooShort => "password_too_short",
            Self::EmptyPassword => "empty_password",
        }
    }
}

/// Lower-cased, trimmed email address used as the login name.
///
/// # Examples
/// ```
/// use weather_gateway::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Ada@Example.COM ").expect("valid email");
/// assert_eq!(email.as_str(), "ada@example.com");
/// assert!(EmailAddress::new("ada.example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CredentialsValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.chars().count() > EMAIL_MAX_CHARS || !looks_like_email(&normalised) {
            return Err(CredentialsValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn looks_like_email(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    let domain_ok = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');
    !local.is_empty()
        && !domain.contains('@')
        && domain_ok
        && !candidate.chars().any(char::is_whitespace)
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = CredentialsValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Password supplied by a caller. `Debug` never shows it.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(******)")
    }
}

/// Validated signup request.
///
/// ## Invariants
/// - `email` is a normalised [`EmailAddress`].
/// - `name` is trimmed, non-empty and at most 100 characters.
/// - `password` has at least 6 characters and keeps caller whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDetails {
    email: EmailAddress,
    name: String,
    password: Password,
}

impl SignupDetails {
    pub fn try_from_parts(
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CredentialsValidationError::EmptyName);
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(CredentialsValidationError::NameTooLong);
        }
        if password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(CredentialsValidationError::PasswordTooShort);
        }
        Ok(Self {
            email,
            name: name.to_owned(),
            password: Password(Zeroizing::new(password.to_owned())),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated login request. Length rules are not re-applied at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Password(Zeroizing::new(password.to_owned())),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}
