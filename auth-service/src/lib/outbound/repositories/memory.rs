use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Credential store kept in process memory.
///
/// Lookup-then-insert happens under a single lock, so the username uniqueness
/// guarantee matches a database unique constraint. Ids start at 1 and
/// increase monotonically.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    users: HashMap<Username, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.state.lock().map(|state| state.users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, UserError> {
        self.state
            .lock()
            .map_err(|_| UserError::StoreUnavailable("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self.lock()?.users.get(username).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<UserId, UserError> {
        let mut state = self.lock()?;

        if state.users.contains_key(&user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }

        state.last_id += 1;
        let id = UserId(state.last_id);
        state.users.insert(
            user.username.clone(),
            User {
                id,
                username: user.username,
                password_hash: user.password_hash,
            },
        );

        Ok(id)
    }

    async fn ping(&self) -> Result<(), UserError> {
        self.lock().map(|_| ())
    }
}
