use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Answers from the token's identity alone; the store is not consulted.
pub async fn protected(
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<ProtectedResponseData> {
    ApiSuccess::new(StatusCode::OK, user.into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectedResponseData {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

impl From<AuthenticatedUser> for ProtectedResponseData {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            message: format!(
                "Welcome {}! You have accessed a protected route.",
                user.username
            ),
            user_id: user.user_id.0,
        }
    }
}
