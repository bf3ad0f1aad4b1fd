use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::INVALID_TOKEN_MESSAGE;
use crate::inbound::http::handlers::MISSING_TOKEN_MESSAGE;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Extension type to store the token's identity in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

/// Middleware that validates bearer tokens and adds the user to request extensions.
///
/// No bearer value yields 401. A header that is sent but unreadable, or a
/// token that fails verification for any reason, yields 403.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?;

    let claims = state
        .authenticator
        .validate_token(token)
        .map_err(|e| ApiError::from(UserError::from(e)))?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(claims.user_id),
        username: claims.username,
    });

    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// # Errors
/// * `Unauthorized` - Header absent, scheme not Bearer, or token empty
/// * `Forbidden` - Header value is not valid UTF-8
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let missing = || {
        tracing::debug!("Protected route requested without a bearer token");
        ApiError::Unauthorized(MISSING_TOKEN_MESSAGE.to_string())
    };

    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(missing)?
        .to_str()
        .map_err(|e| {
            tracing::warn!(error = %e, "Rejected unreadable authorization header");
            ApiError::Forbidden(INVALID_TOKEN_MESSAGE.to_string())
        })?;

    let (scheme, token) = value.trim().split_once(' ').ok_or_else(missing)?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(missing());
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(missing());
    }

    Ok(token)
}
