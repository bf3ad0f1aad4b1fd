use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::TokenError;
use crate::jwt::TokenHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_handler: TokenHandler,
    decoy_hash: Option<String>,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed session token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create an authenticator issuing tokens with the default one hour lifetime.
    ///
    /// # Arguments
    /// * `secret` - Process-wide token signing secret
    pub fn new(secret: &[u8]) -> Self {
        Self::from_token_handler(TokenHandler::new(secret))
    }

    /// Create an authenticator issuing tokens that expire after `lifetime`.
    pub fn with_lifetime(secret: &[u8], lifetime: Duration) -> Self {
        Self::from_token_handler(TokenHandler::with_lifetime(secret, lifetime))
    }

    fn from_token_handler(token_handler: TokenHandler) -> Self {
        let password_hasher = PasswordHasher::new();

        Self {
            decoy_hash: decoy_hash(&password_hasher),
            password_hasher,
            token_handler,
        }
    }

    /// Replace the password hasher (e.g. with a cheaper cost in tests).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.decoy_hash = decoy_hash(&password_hasher);
        self.password_hasher = password_hasher;
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Identifier embedded in the token
    /// * `username` - Username embedded in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be checked
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: i64,
        username: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_handler.issue(user_id, username)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Spend one password verification on a throwaway hash.
    ///
    /// Called when the username is unknown, so that a failed login costs the
    /// same whether or not the account exists.
    pub fn verify_against_decoy(&self, password: &str) {
        if let Some(hash) = &self.decoy_hash {
            let _ = self.password_hasher.verify(password, hash);
        }
    }

    /// Validate a session token and return its claims.
    ///
    /// # Errors
    /// * `TokenError` - Signature invalid, token expired or malformed
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_handler.verify(token)
    }
}

/// Hash with the same cost as real accounts, built up front so that the
/// first unknown-username login is not slower than the rest.
fn decoy_hash(password_hasher: &PasswordHasher) -> Option<String> {
    password_hasher.hash("decoy-password").ok()
}
