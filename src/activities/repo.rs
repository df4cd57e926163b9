use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::activities::repo_types::{Activity, ActivityChanges, ActivityFilter, NewActivity};

/// Every lookup is scoped to the owning user.
#[async_trait]
pub trait ActivityRepo: Send + Sync {
    async fn list(&self, filter: ActivityFilter, limit: i64, offset: i64)
        -> anyhow::Result<Vec<Activity>>;
    async fn count(&self, filter: ActivityFilter) -> anyhow::Result<i64>;
    async fn find(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Activity>>;
    async fn create(&self, activity: NewActivity) -> anyhow::Result<Activity>;
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: ActivityChanges,
    ) -> anyhow::Result<Option<Activity>>;
    /// Returns whether a row was removed.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

const ACTIVITY_COLUMNS: &str = "id, user_id, title, description, content, template_id, \
     game_template_id, difficulty, tags, status, created_at, updated_at";

#[derive(Clone)]
pub struct PgActivityRepo {
    db: PgPool,
}

impl PgActivityRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivityRepo for PgActivityRepo {
    async fn list(
        &self,
        filter: ActivityFilter,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Activity>> {
        let rows = sqlx::query_as::<_, Activity>(&format!(
            r#"
            SELECT {ACTIVITY_COLUMNS}
              FROM activities
             WHERE user_id = $1
               AND ($2::activity_status IS NULL OR status = $2)
             ORDER BY updated_at DESC
             LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.user_id)
        .bind(filter.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .context("list activities")?;
        Ok(rows)
    }

    async fn count(&self, filter: ActivityFilter) -> anyhow::Result<i64> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
              FROM activities
             WHERE user_id = $1
               AND ($2::activity_status IS NULL OR status = $2)
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.status)
        .fetch_one(&self.db)
        .await
        .context("count activities")?;
        Ok(total)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Activity>> {
        let row = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("find activity")?;
        Ok(row)
    }

    async fn create(&self, a: NewActivity) -> anyhow::Result<Activity> {
        let row = sqlx::query_as::<_, Activity>(&format!(
            r#"
            INSERT INTO activities
                (user_id, title, description, content, template_id, game_template_id,
                 difficulty, tags, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'DRAFT')
            RETURNING {ACTIVITY_COLUMNS}
            "#
        ))
        .bind(a.user_id)
        .bind(a.title)
        .bind(a.description)
        .bind(a.content)
        .bind(a.template_id)
        .bind(a.game_template_id)
        .bind(a.difficulty)
        .bind(a.tags)
        .fetch_one(&self.db)
        .await
        .context("insert activity")?;
        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        c: ActivityChanges,
    ) -> anyhow::Result<Option<Activity>> {
        let row = sqlx::query_as::<_, Activity>(&format!(
            r#"
            UPDATE activities
               SET title = COALESCE($3, title),
                   description = COALESCE($4, description),
                   content = COALESCE($5, content),
                   template_id = COALESCE($6, template_id),
                   game_template_id = COALESCE($7, game_template_id),
                   difficulty = COALESCE($8, difficulty),
                   tags = COALESCE($9, tags),
                   status = COALESCE($10, status),
                   updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING {ACTIVITY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(c.title)
        .bind(c.description)
        .bind(c.content)
        .bind(c.template_id)
        .bind(c.game_template_id)
        .bind(c.difficulty)
        .bind(c.tags)
        .bind(c.status)
        .fetch_optional(&self.db)
        .await
        .context("update activity")?;
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete activity")?;
        Ok(result.rows_affected() > 0)
    }
}
