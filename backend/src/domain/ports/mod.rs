//! Domain ports for the snapshot lifecycle.
//!
//! Persistence and filesystem adapters live in `crate::outbound`; services in
//! `crate::domain` depend only on these traits.

mod macros;
pub(crate) use macros::define_port_error;

mod session_tokens;
mod snapshot_store;
mod state_export;
mod state_import;
mod state_inventory;

#[cfg(test)]
pub use session_tokens::MockSessionTokenRepository;
pub use session_tokens::{SessionTokenError, SessionTokenRepository};
#[cfg(test)]
pub use snapshot_store::MockSnapshotStore;
pub use snapshot_store::{SnapshotStore, SnapshotStoreError};
#[cfg(test)]
pub use state_export::MockStateExporter;
pub use state_export::{StateExportError, StateExporter};
#[cfg(test)]
pub use state_import::MockStateImporter;
pub use state_import::{StateImportError, StateImporter};
#[cfg(test)]
pub use state_inventory::MockStateInventory;
pub use state_inventory::{StateInventory, StateInventoryError};
