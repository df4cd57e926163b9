use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    activities::{
        dto::{
            ActivityListResponse, ActivityResponse, CreateActivityRequest, ListQuery, Pagination,
            UpdateActivityRequest,
        },
        repo_types::{Activity, ActivityChanges, ActivityFilter, NewActivity},
    },
    auth::{dto::MessageResponse, extractors::AuthUser},
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

pub fn activities_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).post(create_activity))
        .route(
            "/:id",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_activities(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> AppResult<Json<ActivityListResponse>> {
    let offset = q.validate()?;
    let filter = ActivityFilter {
        user_id: user.id,
        status: q.status,
    };
    let activities = state.activities.list(filter, q.limit, offset).await?;
    let total = state.activities.count(filter).await?;

    Ok(Json(ActivityListResponse {
        activities,
        pagination: Pagination::new(q.page, q.limit, total),
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_activity(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Activity>> {
    state
        .activities
        .find(user.id, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Activity"))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_activity(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<CreateActivityRequest>,
) -> AppResult<(StatusCode, Json<ActivityResponse>)> {
    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".into()));
    }

    let activity = state
        .activities
        .create(NewActivity {
            user_id: user.id,
            title,
            description: payload.description,
            content: payload
                .content
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            template_id: payload.template_id,
            game_template_id: payload.game_template_id,
            difficulty: payload.difficulty,
            tags: payload.tags,
        })
        .await?;

    info!(activity_id = %activity.id, "activity created");
    Ok((
        StatusCode::CREATED,
        Json(ActivityResponse {
            message: "Activity created",
            activity,
        }),
    ))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_activity(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateActivityRequest>,
) -> AppResult<Json<ActivityResponse>> {
    let changes = ActivityChanges::try_from(payload)?;
    let activity = state
        .activities
        .update(user.id, id, changes)
        .await?
        .ok_or(AppError::NotFound("Activity"))?;

    info!(activity_id = %activity.id, "activity updated");
    Ok(Json(ActivityResponse {
        message: "Activity updated",
        activity,
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_activity(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    if !state.activities.delete(user.id, id).await? {
        return Err(AppError::NotFound("Activity"));
    }
    info!(activity_id = %id, "activity deleted");
    Ok(Json(MessageResponse {
        message: "Activity deleted",
    }))
}
