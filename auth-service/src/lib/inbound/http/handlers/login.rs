use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::CredentialsRequest;
use crate::domain::user::models::Session;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    request: CredentialsRequest,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let credentials = request.into_credentials()?;

    state
        .user_service
        .login(credentials)
        .await
        .map_err(ApiError::from)
        .map(|session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub message: String,
    pub token: String,
}

impl From<Session> for LoginResponseData {
    fn from(session: Session) -> Self {
        Self {
            message: "Login successful.".to_string(),
            token: session.token,
        }
    }
}
