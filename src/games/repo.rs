use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::games::repo_types::{GameSession, GameSessionChanges, GameTotals, NewGameSession};

#[async_trait]
pub trait GameSessionRepo: Send + Sync {
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<GameSession>>;
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<GameSession>>;
    /// Totals over every session, or only `user_id`'s when given.
    async fn totals(&self, user_id: Option<Uuid>) -> anyhow::Result<GameTotals>;
    async fn create(&self, session: NewGameSession) -> anyhow::Result<GameSession>;
    async fn update(
        &self,
        id: Uuid,
        changes: GameSessionChanges,
    ) -> anyhow::Result<Option<GameSession>>;
}

const SESSION_COLUMNS: &str = "id, user_id, game_type, score, questions_answered, \
     correct_answers, wrong_answers, vocabulary, memory_data, start_time, end_time, \
     created_at, updated_at";

#[derive(Clone)]
pub struct PgGameSessionRepo {
    db: PgPool,
}

impl PgGameSessionRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GameSessionRepo for PgGameSessionRepo {
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<GameSession>> {
        let row = sqlx::query_as::<_, GameSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM game_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find game session")?;
        Ok(row)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<GameSession>> {
        let rows = sqlx::query_as::<_, GameSession>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
              FROM game_sessions
             WHERE user_id = $1
             ORDER BY start_time DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list game sessions by user")?;
        Ok(rows)
    }

    async fn totals(&self, user_id: Option<Uuid>) -> anyhow::Result<GameTotals> {
        let totals = sqlx::query_as::<_, GameTotals>(
            r#"
            SELECT COUNT(*)                                   AS sessions,
                   COALESCE(SUM(score), 0)::BIGINT              AS score,
                   COALESCE(SUM(questions_answered), 0)::BIGINT AS questions_answered,
                   COALESCE(SUM(correct_answers), 0)::BIGINT    AS correct_answers
              FROM game_sessions
             WHERE $1::UUID IS NULL OR user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .context("sum game sessions")?;
        Ok(totals)
    }

    async fn create(&self, s: NewGameSession) -> anyhow::Result<GameSession> {
        let row = sqlx::query_as::<_, GameSession>(&format!(
            r#"
            INSERT INTO game_sessions
                (user_id, game_type, score, questions_answered, correct_answers,
                 wrong_answers, vocabulary, memory_data, start_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(s.user_id)
        .bind(s.game_type)
        .bind(s.score)
        .bind(s.questions_answered)
        .bind(s.correct_answers)
        .bind(s.wrong_answers)
        .bind(s.vocabulary)
        .bind(s.memory_data)
        .bind(s.start_time)
        .fetch_one(&self.db)
        .await
        .context("insert game session")?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        c: GameSessionChanges,
    ) -> anyhow::Result<Option<GameSession>> {
        let row = sqlx::query_as::<_, GameSession>(&format!(
            r#"
            UPDATE game_sessions
               SET score = COALESCE($2, score),
                   questions_answered = COALESCE($3, questions_answered),
                   correct_answers = COALESCE($4, correct_answers),
                   wrong_answers = COALESCE($5, wrong_answers),
                   vocabulary = COALESCE($6, vocabulary),
                   memory_data = COALESCE($7, memory_data),
                   end_time = COALESCE($8, end_time),
                   updated_at = now()
             WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(c.score)
        .bind(c.questions_answered)
        .bind(c.correct_answers)
        .bind(c.wrong_answers)
        .bind(c.vocabulary)
        .bind(c.memory_data)
        .bind(c.end_time)
        .fetch_optional(&self.db)
        .await
        .context("update game session")?;
        Ok(row)
    }
}
