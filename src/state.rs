use std::sync::Arc;

use diesel::{
    pg::PgConnection,
    r2d2::{ConnectionManager, PooledConnection},
};

use crate::{
    auth::jwt::JwtService,
    config::AppConfig,
    db::PgPool,
    error::{AppError, AppResult},
    storage::ObjectStorage,
};

pub type DbConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Shared handles every handler needs: the connection pool, the resolved
/// configuration, the document store, and the token service.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn ObjectStorage>,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: AppConfig,
        storage: Arc<dyn ObjectStorage>,
        jwt: JwtService,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            storage,
            jwt,
        }
    }

    /// Checks out a pooled connection, surfacing exhaustion as a 500.
    pub fn db(&self) -> AppResult<DbConn> {
        self.pool
            .get()
            .map_err(|err| AppError::internal(format!("database pool exhausted: {err}")))
    }
}
