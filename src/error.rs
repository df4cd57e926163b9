use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, rejection::QueryRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{auth::jwt::TokenError, state::AppState};

/// Every failure a request can end in.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication token not provided")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("User does not exist")]
    UnknownUser,
    #[error("User already exists")]
    DuplicateEmail,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Detail of a 500 kept out of the body until `expose_error_details` decides.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::UnknownUser
            | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::DuplicateEmail | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Store(e) => {
                error!(error = ?e, "request failed");
                let mut res = (
                    status,
                    Json(json!({
                        "error": "Internal server error",
                        "message": "Something went wrong",
                    })),
                )
                    .into_response();
                res.extensions_mut().insert(ErrorDetail(format!("{e:#}")));
                res
            }
            other => {
                if status == StatusCode::UNAUTHORIZED {
                    warn!(reason = %other, "unauthorized");
                }
                (status, Json(json!({ "error": other.to_string() }))).into_response()
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => Self::TokenExpired,
            TokenError::Invalid => Self::InvalidToken,
            TokenError::Encode(e) => Self::Store(anyhow::Error::new(e).context("sign jwt")),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(r) if r.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Self::PayloadTooLarge(r.body_text())
            }
            other => Self::Validation(other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Response mapper: swaps the generic 500 message for the real error chain in development.
pub async fn expose_error_details(State(state): State<AppState>, mut res: Response) -> Response {
    let Some(ErrorDetail(detail)) = res.extensions_mut().remove::<ErrorDetail>() else {
        return res;
    };
    if !state.config.environment.exposes_error_details() {
        return res;
    }
    (
        res.status(),
        Json(json!({
            "error": "Internal server error",
            "message": detail,
        })),
    )
        .into_response()
}
