use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    activities::repo::{ActivityRepo, PgActivityRepo},
    auth::{
        jwt::JwtKeys,
        repo::{PgUserRepo, UserRepo},
    },
    config::AppConfig,
    games::repo::{GameSessionRepo, PgGameSessionRepo},
};

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub activities: Arc<dyn ActivityRepo>,
    pub games: Arc<dyn GameSessionRepo>,
}

impl AppState {
    /// Wires the PostgreSQL repositories around one shared pool.
    pub fn new(config: Arc<AppConfig>, db: PgPool) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgActivityRepo::new(db.clone())),
            Arc::new(PgGameSessionRepo::new(db)),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        activities: Arc<dyn ActivityRepo>,
        games: Arc<dyn GameSessionRepo>,
    ) -> Self {
        let jwt = JwtKeys::new(&config.jwt);
        Self {
            config,
            jwt,
            users,
            activities,
            games,
        }
    }
}
