use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_GAME_TYPE: &str = "shimozurdo";

/// One play-through of a game, optionally tied to a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub game_type: String,
    pub score: i32,
    pub questions_answered: i32,
    pub correct_answers: i32,
    pub wrong_answers: i32,
    pub vocabulary: serde_json::Value,
    pub memory_data: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewGameSession {
    pub user_id: Option<Uuid>,
    pub game_type: String,
    pub score: i32,
    pub questions_answered: i32,
    pub correct_answers: i32,
    pub wrong_answers: i32,
    pub vocabulary: serde_json::Value,
    pub memory_data: serde_json::Value,
    pub start_time: OffsetDateTime,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct GameSessionChanges {
    pub score: Option<i32>,
    pub questions_answered: Option<i32>,
    pub correct_answers: Option<i32>,
    pub wrong_answers: Option<i32>,
    pub vocabulary: Option<serde_json::Value>,
    pub memory_data: Option<serde_json::Value>,
    pub end_time: Option<OffsetDateTime>,
}

/// Sums across a set of sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct GameTotals {
    pub sessions: i64,
    pub score: i64,
    pub questions_answered: i64,
    pub correct_answers: i64,
}
