use std::fmt;

use crate::user::errors::CredentialError;

/// User aggregate entity.
///
/// Represents a registered user. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub password_hash: String,
}

/// Store-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Case-sensitive and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a new valid username.
    ///
    /// # Errors
    /// * `MissingUsername` - Username is empty
    pub fn new(username: String) -> Result<Self, CredentialError> {
        if username.is_empty() {
            return Err(CredentialError::MissingUsername);
        }
        Ok(Self(username))
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password as received from a client.
///
/// Never empty. The `Debug` output is redacted so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// # Errors
    /// * `MissingPassword` - Password is empty
    pub fn new(password: String) -> Result<Self, CredentialError> {
        if password.is_empty() {
            return Err(CredentialError::MissingPassword);
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Username/password pair used by both registration and login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: Username,
    pub password: Password,
}

impl Credentials {
    /// Validate raw, possibly absent, fields.
    ///
    /// # Errors
    /// * `MissingUsername` - Username absent or empty
    /// * `MissingPassword` - Password absent or empty
    pub fn parse(
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, CredentialError> {
        let username = Username::new(username.unwrap_or_default())?;
        let password = Password::new(password.unwrap_or_default())?;
        Ok(Self { username, password })
    }
}

/// Row to insert when registering a user; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}
