use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    games::{
        dto::{
            CreateSessionRequest, CreatedSessionResponse, OverallStats, StatsQuery,
            UpdateSessionRequest, UpdatedSessionResponse,
        },
        repo_types::GameSessionChanges,
    },
    state::AppState,
};

pub fn games_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats).post(create_session))
        .route("/stats/:session_id", put(update_session))
}

/// One session, one user's sessions, or the global aggregate, depending on the query.
#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<StatsQuery>,
) -> AppResult<Response> {
    if let Some(session_id) = q.session_id {
        let session = state
            .games
            .find(session_id)
            .await?
            .ok_or(AppError::NotFound("Game session"))?;
        return Ok(Json(session).into_response());
    }
    if let Some(user_id) = q.user_id {
        let sessions = state.games.list_by_user(user_id).await?;
        return Ok(Json(sessions).into_response());
    }
    let totals = state.games.totals(None).await?;
    Ok(Json(OverallStats::from(totals)).into_response())
}

#[instrument(skip(state, payload))]
pub async fn create_session(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<CreatedSessionResponse>)> {
    let new_session = payload.into_new_session(OffsetDateTime::now_utc())?;
    let session = state.games.create(new_session).await?;

    info!(session_id = %session.id, game_type = %session.game_type, "game session saved");
    Ok((
        StatusCode::CREATED,
        Json(CreatedSessionResponse {
            session_id: session.id,
            message: "Game stats saved",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_session(
    State(state): State<AppState>,
    ApiPath(session_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateSessionRequest>,
) -> AppResult<Json<UpdatedSessionResponse>> {
    let changes = GameSessionChanges::try_from(payload)?;
    let session = state
        .games
        .update(session_id, changes)
        .await?
        .ok_or(AppError::NotFound("Game session"))?;

    Ok(Json(UpdatedSessionResponse {
        message: "Game stats updated",
        session,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use axum::body::to_bytes;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn session_body(user_id: Option<Uuid>, score: i32, answered: i32, correct: i32) -> ApiJson<CreateSessionRequest> {
        ApiJson(CreateSessionRequest {
            user_id,
            score: Some(score),
            questions_answered: Some(answered),
            correct_answers: Some(correct),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn overall_stats_on_empty_store_are_zero() {
        let state = MemoryStore::state();
        let res = get_stats(State(state), ApiQuery(StatsQuery::default()))
            .await
            .unwrap();
        let json = body_json(res).await;
        assert_eq!(json["totalSessions"], 0);
        assert_eq!(json["averageScore"], 0.0);
        assert_eq!(json["overallAccuracy"], 0.0);
    }

    #[tokio::test]
    async fn stats_by_session_user_and_overall() {
        let state = MemoryStore::state();
        let player = Uuid::new_v4();
        let (status, Json(created)) =
            create_session(State(state.clone()), session_body(Some(player), 80, 10, 8))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        create_session(State(state.clone()), session_body(None, 20, 10, 2))
            .await
            .unwrap();

        let res = get_stats(
            State(state.clone()),
            ApiQuery(StatsQuery {
                session_id: Some(created.session_id),
                user_id: None,
            }),
        )
        .await
        .unwrap();
        let json = body_json(res).await;
        assert_eq!(json["score"], 80);
        assert_eq!(json["gameType"], "shimozurdo");

        let res = get_stats(
            State(state.clone()),
            ApiQuery(StatsQuery {
                session_id: None,
                user_id: Some(player),
            }),
        )
        .await
        .unwrap();
        assert_eq!(body_json(res).await.as_array().map(Vec::len), Some(1));

        let res = get_stats(State(state), ApiQuery(StatsQuery::default()))
            .await
            .unwrap();
        let json = body_json(res).await;
        assert_eq!(json["totalSessions"], 2);
        assert_eq!(json["averageScore"], 50.0);
        assert_eq!(json["totalQuestions"], 20);
        assert_eq!(json["overallAccuracy"], 50.0);
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let state = MemoryStore::state();
        let err = get_stats(
            State(state.clone()),
            ApiQuery(StatsQuery {
                session_id: Some(Uuid::new_v4()),
                user_id: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = update_session(
            State(state),
            ApiPath(Uuid::new_v4()),
            ApiJson(UpdateSessionRequest::default()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Game session")));
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let state = MemoryStore::state();
        let (_, Json(created)) = create_session(State(state.clone()), session_body(None, 10, 5, 3))
            .await
            .unwrap();

        let Json(updated) = update_session(
            State(state),
            ApiPath(created.session_id),
            ApiJson(UpdateSessionRequest {
                score: Some(42),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.session.score, 42);
        assert_eq!(updated.session.questions_answered, 5);
        assert_eq!(updated.session.correct_answers, 3);
    }
}
