use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session token payload.
///
/// Serialized as `{"userId", "username", "iat", "exp"}`; `iat` and `exp`
/// are Unix timestamps in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Store-assigned identifier of the authenticated user
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Username at the time of login
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, issued now and expiring after `lifetime`.
    pub fn for_user(user_id: i64, username: impl Into<String>, lifetime: Duration) -> Self {
        Self::issued_at(user_id, username, Utc::now(), lifetime)
    }

    /// Create claims for a user with an explicit issuance time.
    pub fn issued_at(
        user_id: i64,
        username: impl Into<String>,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }
}
