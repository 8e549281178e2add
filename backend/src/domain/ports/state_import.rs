//! Port for transactional bulk inserts of family state.
//!
//! Restore and bulk import both write through this port. Every call is one
//! transaction: either all rows of the call are committed or none are.

use async_trait::async_trait;

use crate::domain::{Cocktail, User, UserBar};

use super::define_port_error;

define_port_error! {
    /// Errors raised by a bulk insert; the transaction has been rolled back.
    pub enum StateImportError {
        /// Repository connection could not be established.
        Connection { message: String } => "state import connection failed: {message}",
        /// A foreign key, unique or check constraint rejected a row.
        Constraint { message: String } => "state import violated a constraint: {message}",
        /// Any other insert failure.
        Query { message: String } => "state import query failed: {message}",
    }
}

/// Port inserting whole families inside one transaction per call.
///
/// Identifiers are preserved exactly as given.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateImporter: Send + Sync {
    /// Insert users. Returns the number of users committed.
    async fn insert_users(&self, users: &[User]) -> Result<usize, StateImportError>;

    /// Insert bars. Fails if any bar references a missing user or a user who
    /// already has a bar.
    async fn insert_bars(&self, bars: &[UserBar]) -> Result<usize, StateImportError>;

    /// Insert cocktails, each followed by its ingredients. Returns the number
    /// of cocktails committed.
    async fn insert_cocktails(&self, cocktails: &[Cocktail]) -> Result<usize, StateImportError>;
}
