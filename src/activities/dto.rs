use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    activities::repo_types::{Activity, ActivityChanges, ActivityStatus, Difficulty},
    error::AppError,
    extract::empty_as_none,
};

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<ActivityStatus>,
}
fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    10
}

impl ListQuery {
    /// Checks the bounds and returns the row offset of the requested page.
    pub fn validate(&self) -> Result<i64, AppError> {
        if self.page < 1 {
            return Err(AppError::Validation("page must be at least 1".into()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        self.offset()
            .ok_or_else(|| AppError::Validation("page is out of range".into()))
    }

    /// `None` when the offset does not fit in an `i64`.
    pub fn offset(&self) -> Option<i64> {
        self.page.checked_sub(1)?.checked_mul(self.limit)
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityListResponse {
    pub activities: Vec<Activity>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub template_id: Option<Uuid>,
    #[serde(default)]
    pub game_template_id: Option<Uuid>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub template_id: Option<Uuid>,
    #[serde(default)]
    pub game_template_id: Option<Uuid>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<ActivityStatus>,
}

impl TryFrom<UpdateActivityRequest> for ActivityChanges {
    type Error = AppError;

    fn try_from(req: UpdateActivityRequest) -> Result<Self, Self::Error> {
        if req.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::Validation("title must not be empty".into()));
        }
        Ok(Self {
            title: req.title.map(|t| t.trim().to_string()),
            description: req.description,
            content: req.content,
            template_id: req.template_id,
            game_template_id: req.game_template_id,
            difficulty: req.difficulty,
            tags: req.tags,
            status: req.status,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub message: &'static str,
    pub activity: Activity,
}
