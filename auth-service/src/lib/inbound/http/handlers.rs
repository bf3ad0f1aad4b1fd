use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Form;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::Credentials;
use crate::user::errors::UserError;

pub mod index;
pub mod login;
pub mod protected;
pub mod register;

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Username and password are required.";
pub const USERNAME_TAKEN_MESSAGE: &str = "Username already exists.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";
pub const MISSING_TOKEN_MESSAGE: &str = "Authentication required. Token not provided.";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiErrorData { message })).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::MissingCredentials(_) => {
                tracing::debug!(error = %err, "Rejected request with missing credentials");
                ApiError::BadRequest(MISSING_CREDENTIALS_MESSAGE.to_string())
            }
            UserError::UsernameAlreadyExists(_) => {
                tracing::debug!(error = %err, "Rejected duplicate registration");
                ApiError::Conflict(USERNAME_TAKEN_MESSAGE.to_string())
            }
            UserError::InvalidCredentials => {
                tracing::warn!("Rejected login with invalid credentials");
                ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            UserError::Token(ref e) => {
                tracing::warn!(error = %e, "Rejected invalid token");
                ApiError::Forbidden(INVALID_TOKEN_MESSAGE.to_string())
            }
            UserError::Password(_) | UserError::StoreUnavailable(_) | UserError::Unknown(_) => {
                tracing::error!(error = %err, "Request failed on a dependency");
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// HTTP request body shared by register and login.
///
/// Read as a URL-encoded form when the `Content-Type` says so, as JSON
/// otherwise. Both fields are optional here so that an absent field is
/// reported as a missing credential rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl CredentialsRequest {
    /// Validate the raw fields into domain credentials.
    pub fn into_credentials(self) -> Result<Credentials, ApiError> {
        Credentials::parse(self.username, self.password)
            .map_err(|e| ApiError::from(UserError::from(e)))
    }
}

/// A body that cannot be decoded is treated like one with no fields.
#[async_trait]
impl<S> FromRequest<S> for CredentialsRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let decoded = if is_form(req.headers()) {
            Form::<Self>::from_request(req, state)
                .await
                .map(|Form(request)| request)
                .map_err(|rejection| rejection.body_text())
        } else {
            Json::<Self>::from_request(req, state)
                .await
                .map(|Json(request)| request)
                .map_err(|rejection| rejection.body_text())
        };

        Ok(decoded.unwrap_or_else(|error| {
            tracing::debug!(error = %error, "Request body is not usable");
            Self::default()
        }))
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}
