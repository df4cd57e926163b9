use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::{User, UserChanges};

/// Profile edit; empty strings count as "unchanged".
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<UpdateProfileRequest> for UserChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        fn non_empty(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            name: non_empty(req.name),
            image: non_empty(req.image),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub message: &'static str,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct StatsUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub activity_count: i64,
    pub total_sessions: i64,
    pub total_score: i64,
    pub average_score: f64,
}

impl UserStats {
    pub fn new(activity_count: i64, total_sessions: i64, total_score: i64) -> Self {
        let average_score = if total_sessions > 0 {
            total_score as f64 / total_sessions as f64
        } else {
            0.0
        };
        Self {
            activity_count,
            total_sessions,
            total_score,
            average_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    pub user: StatsUser,
    pub stats: UserStats,
}
