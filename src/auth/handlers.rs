use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, MessageResponse, PublicUser, RegisterRequest,
            RegisterResponse, VerifyResponse,
        },
        extractors::AuthUser,
        services,
    },
    error::AppResult,
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify", get(verify))
        .route("/logout", post(logout))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let (user, token) = services::register(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful",
            user,
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (user, token) = services::login(&state, payload).await?;
    Ok(Json(LoginResponse {
        message: "Login successful",
        user: PublicUser::from(&user),
        token,
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn verify(AuthUser(user): AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        user: PublicUser::from(&user),
    })
}

/// Tokens are stateless; the client discards its copy.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logout successful",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::extractors::authenticate, error::AppError, memory::MemoryStore,
        users::handlers::get_profile,
    };
    use axum::http::{header::AUTHORIZATION, HeaderMap};

    fn register_body(email: &str) -> ApiJson<RegisterRequest> {
        ApiJson(RegisterRequest {
            name: Some("Ana".into()),
            email: email.into(),
            password: "password123".into(),
        })
    }

    #[test]
    fn message_response_serialization() {
        let response = MessageResponse { message: "ok" };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"message":"ok"}"#);
    }

    #[tokio::test]
    async fn register_then_fetch_profile_with_token() {
        let state = MemoryStore::state();
        let (status, Json(registered)) =
            register(State(state.clone()), register_body("Ana@Example.com"))
                .await
                .expect("register");
        assert_eq!(status, StatusCode::CREATED);

        let body = serde_json::to_value(&registered).unwrap();
        assert_eq!(body["user"]["email"], "ana@example.com");
        assert!(body["user"].get("passwordHash").is_none());
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", registered.token).parse().unwrap(),
        );
        let user = authenticate(&state, &headers)
            .await
            .expect("token authenticates");

        let Json(profile) = get_profile(AuthUser(user)).await;
        let profile = serde_json::to_value(&profile).unwrap();
        assert_eq!(profile["id"], body["user"]["id"]);
        assert_eq!(profile["email"], "ana@example.com");
        assert_eq!(profile["name"], "Ana");
        assert!(profile.get("passwordHash").is_none());
        assert!(profile.get("password").is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_is_400() {
        let state = MemoryStore::state();
        register(State(state.clone()), register_body("foo@x.com"))
            .await
            .unwrap();
        let err = register(State(state), register_body("FOO@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_returns_public_user_and_token() {
        let state = MemoryStore::state();
        register(State(state.clone()), register_body("foo@x.com"))
            .await
            .unwrap();
        let Json(res) = login(
            State(state.clone()),
            ApiJson(LoginRequest {
                email: "foo@x.com".into(),
                password: "password123".into(),
            }),
        )
        .await
        .expect("login");
        let body = serde_json::to_value(&res).unwrap();
        assert_eq!(body["user"]["role"], "USER");
        assert_eq!(body["user"]["email"], "foo@x.com");
        assert!(state.jwt.verify(&res.token).is_ok());
    }

    #[tokio::test]
    async fn logout_is_a_no_op() {
        let Json(res) = logout().await;
        assert_eq!(res.message, "Logout successful");
    }
}
