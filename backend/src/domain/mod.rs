//! Domain entities and snapshot lifecycle services.
//!
//! Public surface:
//! - entities: [`Cocktail`], [`Ingredient`], [`User`], [`Role`], [`UserBar`];
//! - snapshot naming: [`SnapshotFamily`], [`SnapshotSeries`],
//!   [`SnapshotTimestamp`];
//! - codec bridge: [`FamilyState`];
//! - services: [`RestoreOrchestrator`], [`BulkImportService`],
//!   [`SnapshotCaptureService`], [`ShutdownSynchronizer`].
//!
//! Services talk to the outside world only through [`ports`].

mod bar;
mod cocktail;
mod family_state;
pub mod import;
pub mod ports;
pub mod restore;
pub mod shutdown;
mod snapshot;
pub mod snapshot_capture;
mod user;

pub use self::bar::{BarItem, RemovedCocktail, UserBar};
pub use self::cocktail::{Cocktail, Ingredient};
pub use self::family_state::{FamilyState, decode_cocktails, encode_cocktails};
pub use self::import::{BulkImportService, ImportError, ImportReport};
pub use self::restore::{
    FamilyRestore, FamilyRestoreStatus, RestoreError, RestoreOrchestrator, RestoreReport,
    RestoreState, cocktails_are_empty, whole_store_is_empty,
};
pub use self::shutdown::{ShutdownReport, ShutdownSynchronizer};
pub use self::snapshot::{SnapshotFamily, SnapshotSeries, SnapshotTimestamp};
pub use self::snapshot_capture::{CaptureReport, SnapshotCaptureError, SnapshotCaptureService};
pub use self::user::{Role, User};
