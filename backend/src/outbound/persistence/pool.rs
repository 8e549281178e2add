//! Connection pool shared by the lifecycle adapters.
//!
//! The server sizes its pool from [`LifecycleSettings`]. Operator commands run
//! a single use case and cap the pool at one connection. Checkout failures
//! carry the configured timeout.
//!
//! [`LifecycleSettings`]: crate::lifecycle::LifecycleSettings

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::debug;

/// Connections the server keeps when nothing is configured.
pub const DEFAULT_POOL_MAX_SIZE: u32 = 8;
/// Checkout timeout when nothing is configured.
pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool failures, surfaced to the ports as connection errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The pool could not be built.
    #[error("database pool unavailable: {message}")]
    Unavailable { message: String },

    /// No connection became free within the checkout timeout.
    #[error("no database connection within {}s: {message}", timeout.as_secs())]
    Checkout { timeout: Duration, message: String },
}

/// Pool sizing for one process.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use cocktails::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/cocktails").for_operator_command();
/// assert_eq!(config.max_size(), 1);
/// assert_eq!(config.checkout_timeout(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    /// Server defaults for `database_url`.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_POOL_MAX_SIZE,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Override the number of connections. Zero is raised to one.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    /// Override the checkout timeout.
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    /// Cap the pool at one connection. Snapshot export and bulk import each
    /// run inside a single transaction.
    pub fn for_operator_command(self) -> Self {
        self.with_max_size(1)
    }

    /// Database URL the pool connects to.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Maximum number of pooled connections.
    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// How long a checkout waits for a free connection.
    pub fn checkout_timeout(&self) -> Duration {
        self.checkout_timeout
    }

    fn idle_floor(&self) -> Option<u32> {
        // One warm connection for the shutdown snapshot once the probes stop.
        (self.max_size > 1).then_some(1)
    }
}

/// Shared PostgreSQL pool. Cloning shares the connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
    checkout_timeout: Duration,
}

impl DbPool {
    /// Build a pool from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Unavailable`] when the URL is rejected or the idle
    /// connection cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url());
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.idle_floor())
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::Unavailable {
                message: err.to_string(),
            })?;
        debug!(
            max_size = config.max_size,
            checkout_timeout_secs = config.checkout_timeout.as_secs(),
            "database pool ready"
        );
        Ok(Self {
            inner,
            checkout_timeout: config.checkout_timeout,
        })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when none is free within the timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner.get().await.map_err(|err| PoolError::Checkout {
            timeout: self.checkout_timeout,
            message: err.to_string(),
        })
    }
}
