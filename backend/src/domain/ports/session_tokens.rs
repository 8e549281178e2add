//! Port for invalidating login sessions.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while purging session tokens.
    pub enum SessionTokenError {
        /// Repository connection could not be established.
        Connection { message: String } => "session token connection failed: {message}",
        /// The delete failed.
        Query { message: String } => "session token purge failed: {message}",
    }
}

/// Port over stored session tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionTokenRepository: Send + Sync {
    /// Delete every session token, returning how many were removed.
    async fn purge_all(&self) -> Result<u64, SessionTokenError>;
}
