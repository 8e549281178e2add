//! Port for counting the rows of each snapshot family.
//!
//! The restore gates ask this port whether the store is empty before any
//! snapshot is read.

use async_trait::async_trait;

use crate::domain::SnapshotFamily;

use super::define_port_error;

define_port_error! {
    /// Errors raised while counting family rows.
    pub enum StateInventoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "state inventory connection failed: {message}",
        /// The count query failed.
        Query { message: String } => "state inventory query failed: {message}",
    }
}

/// Port reporting how many top-level rows a family holds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateInventory: Send + Sync {
    /// Count users, bars or cocktails. Ingredients are not counted.
    async fn count(&self, family: SnapshotFamily) -> Result<u64, StateInventoryError>;
}
