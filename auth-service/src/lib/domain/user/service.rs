use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::user::models::Credentials;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Session;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementing registration and login.
///
/// Holds no mutable state of its own; the repository's uniqueness constraint
/// is the only guard between concurrent registrations. Hashing and password
/// checks run on the blocking thread pool.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hasher and token issuer
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, credentials: Credentials) -> Result<UserId, UserError> {
        let Credentials { username, password } = credentials;

        if self.repository.find_by_username(&username).await?.is_some() {
            return Err(UserError::UsernameAlreadyExists(username.to_string()));
        }

        let authenticator = Arc::clone(&self.authenticator);
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
                .await??;

        let user_id = self
            .repository
            .create(NewUser {
                username: username.clone(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user_id, username = %username, "User registered");

        Ok(user_id)
    }

    async fn login(&self, credentials: Credentials) -> Result<Session, UserError> {
        let Credentials { username, password } = credentials;

        let authenticator = Arc::clone(&self.authenticator);
        let Some(user) = self.repository.find_by_username(&username).await? else {
            tokio::task::spawn_blocking(move || {
                authenticator.verify_against_decoy(password.expose())
            })
            .await?;
            tracing::debug!(username = %username, "Login rejected: unknown username");
            return Err(UserError::InvalidCredentials);
        };

        let stored_hash = user.password_hash.clone();
        let user_id = user.id.0;
        let token_username = user.username.as_str().to_string();
        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(password.expose(), &stored_hash, user_id, &token_username)
        })
        .await?
        .map_err(|e| {
            tracing::debug!(username = %username, error = %e, "Login rejected");
            UserError::from(e)
        })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(Session {
            user,
            token: result.access_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use auth::PasswordHasher;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::Password;
    use crate::domain::user::models::User;
    use crate::domain::user::models::Username;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn create(&self, user: NewUser) -> Result<UserId, UserError>;
            async fn ping(&self) -> Result<(), UserError>;
        }
    }

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(
            Authenticator::new(SECRET)
                .with_password_hasher(PasswordHasher::with_cost(1024, 1, 1).unwrap()),
        )
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: Username::new(username.to_string()).unwrap(),
            password: Password::new(password.to_string()).unwrap(),
        }
    }

    fn stored_user(authenticator: &Authenticator, id: i64, username: &str, password: &str) -> User {
        User {
            id: UserId(id),
            username: Username::new(username.to_string()).unwrap(),
            password_hash: authenticator.hash_password(password).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "testuser"
                    && user.password_hash.starts_with("$argon2id$")
                    && !user.password_hash.contains("password123")
            })
            .times(1)
            .returning(|_| Ok(UserId(7)));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.register(credentials("testuser", "password123")).await;
        assert_eq!(result.unwrap(), UserId(7));
    }

    #[tokio::test]
    async fn test_register_existing_username() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = authenticator();
        let existing = stored_user(&authenticator, 1, "testuser", "other");

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));

        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), authenticator);

        let result = service.register(credentials("testuser", "password123")).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_register_loses_race_on_insert() {
        let mut repository = MockTestUserRepository::new();

        // Lookup misses, but a concurrent insert wins first
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        repository.expect_create().times(1).returning(|user| {
            Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.register(credentials("testuser", "password123")).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_register_store_unavailable() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Err(UserError::StoreUnavailable("connection refused".to_string())));

        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.register(credentials("testuser", "password123")).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::StoreUnavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = authenticator();
        let user = stored_user(&authenticator, 3, "testuser", "password123");

        let username = user.username.clone();
        repository
            .expect_find_by_username()
            .withf(move |u| u == &username)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let session = service
            .login(credentials("testuser", "password123"))
            .await
            .expect("Login failed");
        assert_eq!(session.user.id, UserId(3));

        let claims = authenticator.validate_token(&session.token).unwrap();
        assert_eq!(claims.user_id, 3);
        assert_eq!(claims.username, "testuser");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, 3, "testuser", "password123");

        let mut wrong_password_repository = MockTestUserRepository::new();
        wrong_password_repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let mut unknown_user_repository = MockTestUserRepository::new();
        unknown_user_repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let wrong_password = UserService::new(
            Arc::new(wrong_password_repository),
            Arc::clone(&authenticator),
        )
        .login(credentials("testuser", "nope"))
        .await
        .unwrap_err();

        let unknown_user = UserService::new(Arc::new(unknown_user_repository), authenticator)
            .login(credentials("ghost", "password123"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, UserError::InvalidCredentials));
        assert!(matches!(unknown_user, UserError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_login_store_unavailable() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Err(UserError::StoreUnavailable("timeout".to_string())));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.login(credentials("testuser", "password123")).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::StoreUnavailable(_)
        ));
    }
}
