use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "activity_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "difficulty", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Activity row; always owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content: serde_json::Value,
    pub template_id: Option<Uuid>,
    pub game_template_id: Option<Uuid>,
    pub difficulty: Option<Difficulty>,
    pub tags: Vec<String>,
    pub status: ActivityStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content: serde_json::Value,
    pub template_id: Option<Uuid>,
    pub game_template_id: Option<Uuid>,
    pub difficulty: Option<Difficulty>,
    pub tags: Vec<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ActivityChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<serde_json::Value>,
    pub template_id: Option<Uuid>,
    pub game_template_id: Option<Uuid>,
    pub difficulty: Option<Difficulty>,
    pub tags: Option<Vec<String>>,
    pub status: Option<ActivityStatus>,
}

#[derive(Debug, Clone, Copy)]
pub struct ActivityFilter {
    pub user_id: Uuid,
    pub status: Option<ActivityStatus>,
}
