use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use crate::{
    auth::repo_types::User,
    error::{AppError, AppResult},
    state::AppState,
};

/// Authenticated caller, resolved from the bearer token on every request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Pulls the token out of `Authorization: Bearer <token>`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let header = headers.get(AUTHORIZATION).ok_or(AppError::MissingToken)?;
    let header = header.to_str().map_err(|_| AppError::InvalidToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim);

    match token {
        Some("") => Err(AppError::MissingToken),
        Some(token) => Ok(token),
        // the HTTP parser trims trailing whitespace, so `Bearer ` arrives bare
        None if header.trim().is_empty() || header.trim().eq_ignore_ascii_case("bearer") => {
            Err(AppError::MissingToken)
        }
        None => Err(AppError::InvalidToken),
    }
}

/// Verifies the token and re-reads the user it names.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> AppResult<User> {
    let token = bearer_token(headers)?;
    let claims = state.jwt.verify(token)?;

    match state.users.find_by_id(claims.user_id).await? {
        Some(user) => Ok(user),
        None => {
            warn!(user_id = %claims.user_id, "token for a user that no longer exists");
            Err(AppError::UnknownUser)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(state, &parts.headers).await.map(AuthUser)
    }
}
