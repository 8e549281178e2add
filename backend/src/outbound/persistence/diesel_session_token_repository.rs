//! PostgreSQL-backed session token purge.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SessionTokenError, SessionTokenRepository};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::user_tokens;

/// Diesel-backed implementation of the session token port.
#[derive(Clone)]
pub struct DieselSessionTokenRepository {
    pool: DbPool,
}

impl DieselSessionTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionTokenRepository for DieselSessionTokenRepository {
    async fn purge_all(&self) -> Result<u64, SessionTokenError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SessionTokenError::connection))?;
        let deleted = diesel::delete(user_tokens::table)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                map_diesel_error(err, SessionTokenError::query, SessionTokenError::connection)
            })?;
        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }
}
