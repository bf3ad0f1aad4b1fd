use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::CredentialsRequest;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    request: CredentialsRequest,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let credentials = request.into_credentials()?;

    state
        .user_service
        .register(credentials)
        .await
        .map_err(ApiError::from)
        .map(|user_id| ApiSuccess::new(StatusCode::CREATED, user_id.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

impl From<UserId> for RegisterResponseData {
    fn from(user_id: UserId) -> Self {
        Self {
            message: "User registered successfully.".to_string(),
            user_id: user_id.0,
        }
    }
}
