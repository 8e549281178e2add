//! Port for reading the complete state of a family for snapshotting.

use async_trait::async_trait;

use crate::domain::{FamilyState, SnapshotFamily};

use super::define_port_error;

define_port_error! {
    /// Errors raised while loading family state.
    pub enum StateExportError {
        /// Repository connection could not be established.
        Connection { message: String } => "state export connection failed: {message}",
        /// A read query failed.
        Query { message: String } => "state export query failed: {message}",
        /// A stored row could not be mapped to a domain value.
        Corrupt { message: String } => "stored state is malformed: {message}",
    }
}

/// Port loading every row of a family.
///
/// Implementations should read a family from a single consistent view so a
/// snapshot never mixes rows from different points in time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateExporter: Send + Sync {
    /// Load all rows of `family`. Cocktails come with their ingredients
    /// ordered by order index.
    async fn load(&self, family: SnapshotFamily) -> Result<FamilyState, StateExportError>;
}
