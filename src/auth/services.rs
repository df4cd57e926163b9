use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        password::{hash_password_blocking, verify_password_blocking},
        repo_types::{NewUser, Role, User},
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Creates the account and returns it with a fresh token.
pub async fn register(state: &AppState, payload: RegisterRequest) -> AppResult<(User, String)> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password_blocking(payload.password).await?;
    let name = payload
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let user = state
        .users
        .create(NewUser {
            name,
            email,
            password_hash: Some(password_hash),
            role: Role::User,
        })
        .await
        .map_err(|e| match e.downcast_ref::<sqlx::Error>() {
            // lost a race with a concurrent registration of the same email
            Some(sqlx::Error::Database(db)) if db.is_unique_violation() => AppError::DuplicateEmail,
            _ => AppError::Store(e),
        })?;

    let token = state.jwt.sign(user.id, &user.email)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((user, token))
}

/// Unknown email, passwordless account and wrong password all end in `InvalidCredentials`.
pub async fn login(state: &AppState, payload: LoginRequest) -> AppResult<(User, String)> {
    let email = normalize_email(&payload.email);

    let user = state.users.find_by_email(&email).await?;
    let stored_hash = user.as_ref().and_then(|u| u.password_hash.clone());
    let ok = verify_password_blocking(payload.password, stored_hash).await?;

    let user = match user {
        Some(user) if ok => user,
        Some(user) => {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }
        None => {
            warn!(%email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };

    let token = state.jwt.sign(user.id, &user.email)?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, token))
}
