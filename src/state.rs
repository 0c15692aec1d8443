use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::config::AppConfig;

/// Shared, read-only application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool, jwt: JwtKeys) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        }
    }

    pub fn bcrypt_work_factor(&self) -> u32 {
        self.config.security.bcrypt_work_factor
    }
}
