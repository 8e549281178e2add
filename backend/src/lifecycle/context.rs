//! Explicit lifecycle context.
//!
//! Built once at process start and handed to the restore, import and
//! shutdown paths; nothing in the lifecycle reads global state.

use std::path::PathBuf;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    SessionTokenRepository, SnapshotStore, StateExporter, StateImporter, StateInventory,
};
use crate::domain::{
    BulkImportService, RestoreOrchestrator, ShutdownSynchronizer, SnapshotCaptureService,
};
use crate::outbound::persistence::{DbPool, DieselSessionTokenRepository, DieselStateRepository};
use crate::outbound::snapshots::FsSnapshotStore;

/// Services making up the snapshot lifecycle.
///
/// `R` is the state repository (inventory, export and import), `S` the
/// snapshot store and `T` the session token repository.
pub struct LifecycleContext<R, S, T> {
    /// Startup restore.
    pub restore: RestoreOrchestrator<R, S, R>,
    /// Operator bulk import.
    pub import: BulkImportService<S, R>,
    /// Snapshot capture, shared with the shutdown task.
    pub capture: Arc<SnapshotCaptureService<R, S>>,
    /// Shutdown sequence.
    pub shutdown: ShutdownSynchronizer<R, S, T>,
}

/// Context wired to PostgreSQL and the local filesystem.
pub type PgLifecycleContext =
    LifecycleContext<DieselStateRepository, FsSnapshotStore, DieselSessionTokenRepository>;

/// Adapters a [`LifecycleContext`] is assembled from.
pub struct LifecyclePorts<R, S, T> {
    /// State repository.
    pub repository: Arc<R>,
    /// Snapshot store.
    pub store: Arc<S>,
    /// Session token repository.
    pub tokens: Arc<T>,
    /// Clock for snapshot timestamps.
    pub clock: Arc<dyn Clock>,
    /// Default import file.
    pub import_path: PathBuf,
}

impl<R, S, T> LifecycleContext<R, S, T>
where
    R: StateInventory + StateExporter + StateImporter + 'static,
    S: SnapshotStore + 'static,
    T: SessionTokenRepository,
{
    /// Assemble the lifecycle services over one set of adapters.
    pub fn new(ports: LifecyclePorts<R, S, T>) -> Self {
        let LifecyclePorts {
            repository,
            store,
            tokens,
            clock,
            import_path,
        } = ports;
        let capture = Arc::new(SnapshotCaptureService::new(
            Arc::clone(&repository),
            Arc::clone(&store),
            clock,
        ));
        Self {
            restore: RestoreOrchestrator::new(
                Arc::clone(&repository),
                Arc::clone(&store),
                Arc::clone(&repository),
            ),
            import: BulkImportService::new(Arc::clone(&store), repository, import_path),
            shutdown: ShutdownSynchronizer::new(Arc::clone(&capture), tokens),
            capture,
        }
    }
}

impl PgLifecycleContext {
    /// Wire the context to a database pool and a snapshot root.
    pub fn from_pool(
        pool: DbPool,
        snapshots_root: impl Into<PathBuf>,
        import_path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(LifecyclePorts {
            repository: Arc::new(DieselStateRepository::new(pool.clone())),
            store: Arc::new(FsSnapshotStore::new(snapshots_root)),
            tokens: Arc::new(DieselSessionTokenRepository::new(pool)),
            clock: Arc::new(DefaultClock),
            import_path: import_path.into(),
        })
    }
}
