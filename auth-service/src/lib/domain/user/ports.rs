use async_trait::async_trait;

use crate::domain::user::models::Credentials;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

/// Port for the authentication flow exposed to inbound adapters.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `credentials` - Validated username and plaintext password
    ///
    /// # Returns
    /// Identifier assigned by the store
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is taken, including by a concurrent registration
    /// * `Password` - Hashing failed
    /// * `StoreUnavailable` - Credential store could not serve the request
    async fn register(&self, credentials: Credentials) -> Result<UserId, UserError>;

    /// Check credentials and issue a session token.
    ///
    /// # Arguments
    /// * `credentials` - Validated username and plaintext password
    ///
    /// # Returns
    /// The authenticated user and a signed token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `Password` - Stored hash could not be checked
    /// * `Token` - Token signing failed
    /// * `StoreUnavailable` - Credential store could not serve the request
    async fn login(&self, credentials: Credentials) -> Result<Session, UserError>;
}

/// Credential store: persistence for username → password hash mappings.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Backing connection could not serve the request
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Persist a new user.
    ///
    /// The store's uniqueness constraint is authoritative: a username taken by
    /// a prior or concurrent insert fails here even if a lookup just missed it.
    ///
    /// # Returns
    /// Identifier assigned by the store
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `StoreUnavailable` - Backing connection could not serve the request
    async fn create(&self, user: NewUser) -> Result<UserId, UserError>;

    /// Check that the store can serve requests.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store is unreachable
    async fn ping(&self) -> Result<(), UserError>;
}
