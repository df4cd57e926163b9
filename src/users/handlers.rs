use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    activities::repo_types::ActivityFilter,
    auth::{extractors::AuthUser, repo_types::{User, UserChanges}},
    error::{AppError, AppResult},
    extract::ApiJson,
    state::AppState,
    users::dto::{StatsUser, UpdateProfileRequest, UpdateProfileResponse, UserStats, UserStatsResponse},
};

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/stats", get(get_stats))
}

/// The gate already re-read the user, so the profile is served from it.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_profile(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> AppResult<Json<UpdateProfileResponse>> {
    let changes = UserChanges::from(payload);
    let updated = state
        .users
        .update(user.id, changes)
        .await?
        .ok_or(AppError::UnknownUser)?;

    info!("profile updated");
    Ok(Json(UpdateProfileResponse {
        message: "Profile updated",
        user: updated,
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<UserStatsResponse>> {
    let activity_count = state
        .activities
        .count(ActivityFilter {
            user_id: user.id,
            status: None,
        })
        .await?;
    let totals = state.games.totals(Some(user.id)).await?;

    Ok(Json(UserStatsResponse {
        user: StatsUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
        stats: UserStats::new(activity_count, totals.sessions, totals.score),
    }))
}
