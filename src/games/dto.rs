use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::empty_as_none,
    games::repo_types::{
        GameSession, GameSessionChanges, GameTotals, NewGameSession, DEFAULT_GAME_TYPE,
    },
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub session_id: Option<Uuid>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_id: Option<Uuid>,
}

/// Aggregate over all recorded sessions.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_sessions: i64,
    pub average_score: f64,
    pub total_questions: i64,
    pub overall_accuracy: f64,
}

impl From<GameTotals> for OverallStats {
    fn from(t: GameTotals) -> Self {
        let average_score = if t.sessions > 0 {
            t.score as f64 / t.sessions as f64
        } else {
            0.0
        };
        let overall_accuracy = if t.questions_answered > 0 {
            t.correct_answers as f64 / t.questions_answered as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total_sessions: t.sessions,
            average_score,
            total_questions: t.questions_answered,
            overall_accuracy,
        }
    }
}

/// Clients send either epoch milliseconds or an RFC 3339 string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl Timestamp {
    fn parse(&self) -> Result<OffsetDateTime, AppError> {
        let invalid = || AppError::Validation("invalid timestamp".into());
        match self {
            Self::Millis(ms) => {
                OffsetDateTime::from_unix_timestamp_nanos(*ms as i128 * 1_000_000)
                    .map_err(|_| invalid())
            }
            Self::Text(s) => OffsetDateTime::parse(s, &Rfc3339).map_err(|_| invalid()),
        }
    }
}

fn non_negative(field: &str, value: Option<i32>) -> Result<Option<i32>, AppError> {
    match value {
        Some(v) if v < 0 => Err(AppError::Validation(format!("{field} must not be negative"))),
        other => Ok(other),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub questions_answered: Option<i32>,
    #[serde(default)]
    pub correct_answers: Option<i32>,
    #[serde(default)]
    pub wrong_answers: Option<i32>,
    #[serde(default)]
    pub vocabulary: Option<serde_json::Value>,
    #[serde(default)]
    pub memory_data: Option<serde_json::Value>,
    #[serde(default)]
    pub start_time: Option<Timestamp>,
}

impl CreateSessionRequest {
    pub fn into_new_session(self, now: OffsetDateTime) -> Result<NewGameSession, AppError> {
        let start_time = match &self.start_time {
            Some(ts) => ts.parse()?,
            None => now,
        };
        Ok(NewGameSession {
            user_id: self.user_id,
            game_type: self
                .game_type
                .filter(|g| !g.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GAME_TYPE.to_string()),
            score: non_negative("score", self.score)?.unwrap_or(0),
            questions_answered: non_negative("questionsAnswered", self.questions_answered)?
                .unwrap_or(0),
            correct_answers: non_negative("correctAnswers", self.correct_answers)?.unwrap_or(0),
            wrong_answers: non_negative("wrongAnswers", self.wrong_answers)?.unwrap_or(0),
            vocabulary: self.vocabulary.unwrap_or_else(|| serde_json::json!([])),
            memory_data: self.memory_data.unwrap_or_else(|| serde_json::json!([])),
            start_time,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub questions_answered: Option<i32>,
    #[serde(default)]
    pub correct_answers: Option<i32>,
    #[serde(default)]
    pub wrong_answers: Option<i32>,
    #[serde(default)]
    pub vocabulary: Option<serde_json::Value>,
    #[serde(default)]
    pub memory_data: Option<serde_json::Value>,
    #[serde(default)]
    pub end_time: Option<Timestamp>,
}

impl TryFrom<UpdateSessionRequest> for GameSessionChanges {
    type Error = AppError;

    fn try_from(req: UpdateSessionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            score: non_negative("score", req.score)?,
            questions_answered: non_negative("questionsAnswered", req.questions_answered)?,
            correct_answers: non_negative("correctAnswers", req.correct_answers)?,
            wrong_answers: non_negative("wrongAnswers", req.wrong_answers)?,
            vocabulary: req.vocabulary,
            memory_data: req.memory_data,
            end_time: req.end_time.as_ref().map(Timestamp::parse).transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSessionResponse {
    pub session_id: Uuid,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UpdatedSessionResponse {
    pub message: &'static str,
    pub session: GameSession,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_stats_query_params_are_ignored() {
        use axum::{extract::Query, http::Uri};

        let uri: Uri = "/stats?sessionId=&userId=".parse().unwrap();
        let Query(q) = Query::<StatsQuery>::try_from_uri(&uri).unwrap();
        assert!(q.session_id.is_none());
        assert!(q.user_id.is_none());
    }

    #[test]
    fn overall_stats_from_totals() {
        let stats = OverallStats::from(GameTotals {
            sessions: 4,
            score: 100,
            questions_answered: 40,
            correct_answers: 30,
        });
        assert_eq!(stats.average_score, 25.0);
        assert_eq!(stats.total_questions, 40);
        assert_eq!(stats.overall_accuracy, 75.0);
    }

    #[test]
    fn overall_stats_of_nothing_are_zero() {
        let stats = OverallStats::from(GameTotals::default());
        assert_eq!(
            stats,
            OverallStats {
                total_sessions: 0,
                average_score: 0.0,
                total_questions: 0,
                overall_accuracy: 0.0,
            }
        );
    }

    #[test]
    fn create_request_defaults() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let session = CreateSessionRequest::default().into_new_session(now).unwrap();
        assert_eq!(session.game_type, DEFAULT_GAME_TYPE);
        assert_eq!(session.score, 0);
        assert_eq!(session.vocabulary, serde_json::json!([]));
        assert_eq!(session.start_time, now);
    }

    #[test]
    fn start_time_accepts_millis_and_rfc3339() {
        let now = OffsetDateTime::now_utc();
        let req: CreateSessionRequest =
            serde_json::from_value(serde_json::json!({ "startTime": 1_700_000_000_000i64 }))
                .unwrap();
        assert_eq!(
            req.into_new_session(now).unwrap().start_time.unix_timestamp(),
            1_700_000_000
        );

        let req: CreateSessionRequest =
            serde_json::from_value(serde_json::json!({ "startTime": "2023-11-14T22:13:20Z" }))
                .unwrap();
        assert_eq!(
            req.into_new_session(now).unwrap().start_time.unix_timestamp(),
            1_700_000_000
        );
    }

    #[test]
    fn negative_counts_are_rejected() {
        let req = CreateSessionRequest {
            score: Some(-1),
            ..Default::default()
        };
        assert!(req.into_new_session(OffsetDateTime::now_utc()).is_err());

        let req = UpdateSessionRequest {
            wrong_answers: Some(-3),
            ..Default::default()
        };
        assert!(GameSessionChanges::try_from(req).is_err());
    }
}
