//! Shutdown ordering against a slow snapshot store.
//!
//! The store delays every write; the synchronizer must still not return
//! before all three files are on disk.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cocktails::domain::ports::{SnapshotStore, SnapshotStoreError};
use cocktails::domain::{
    ShutdownSynchronizer, SnapshotCaptureService, SnapshotFamily, SnapshotSeries,
    SnapshotTimestamp,
};
use cocktails::outbound::snapshots::FsSnapshotStore;
use cocktails::test_support::cap_fs::{path_exists, write_file};
use cocktails::test_support::{FixtureClock, InMemoryState, fixtures};
use rstest::{fixture, rstest};
use tempfile::TempDir;

/// Delays each write before handing it to the filesystem store.
struct SlowStore {
    inner: FsSnapshotStore,
    delay: Duration,
    completed: AtomicUsize,
}

#[async_trait]
impl SnapshotStore for SlowStore {
    async fn write(
        &self,
        series: SnapshotSeries,
        timestamp: SnapshotTimestamp,
        bytes: Vec<u8>,
    ) -> Result<PathBuf, SnapshotStoreError> {
        tokio::time::sleep(self.delay).await;
        let path = self.inner.write(series, timestamp, bytes).await?;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(path)
    }

    async fn latest(&self, series: SnapshotSeries) -> Result<Option<PathBuf>, SnapshotStoreError> {
        self.inner.latest(series).await
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, SnapshotStoreError> {
        self.inner.read(path).await
    }
}

#[fixture]
fn root() -> TempDir {
    tempfile::tempdir().expect("temp dir")
}

fn populated_state() -> Arc<InMemoryState> {
    let state = InMemoryState::seeded(fixtures::users(), fixtures::bars(), fixtures::cocktails());
    state
        .issue_token(fixtures::GRACE_ID, "session-1")
        .expect("owner exists");
    Arc::new(state)
}

#[rstest]
#[tokio::test]
async fn snapshot_files_exist_before_shutdown_returns(root: TempDir) {
    let state = populated_state();
    let store = Arc::new(SlowStore {
        inner: FsSnapshotStore::new(root.path()),
        delay: Duration::from_millis(200),
        completed: AtomicUsize::new(0),
    });
    let capture = SnapshotCaptureService::new(
        Arc::clone(&state),
        Arc::clone(&store),
        Arc::new(FixtureClock::at_fixture_instant()),
    );
    let synchronizer = ShutdownSynchronizer::new(Arc::new(capture), Arc::clone(&state));

    let report = synchronizer.shutdown().await;

    assert_eq!(store.completed.load(Ordering::SeqCst), 3);
    let snapshot = report.snapshot.expect("capture task finished");
    assert!(snapshot.is_complete(), "failures: {:?}", snapshot.failures);
    for family in SnapshotFamily::RESTORE_ORDER {
        let path = root
            .path()
            .join(family.directory())
            .join(SnapshotSeries::state(family).file_name(snapshot.timestamp));
        assert!(path_exists(&path), "{} missing", path.display());
    }
    assert_eq!(report.tokens_purged, Some(1));
    assert_eq!(state.token_count(), 0);
}

#[rstest]
#[tokio::test]
async fn store_failure_does_not_block_the_token_purge(root: TempDir) {
    let blocker = root.path().join("Users");
    write_file(&blocker, b"not a directory")
        .expect("blocking file written");
    let state = populated_state();
    let capture = SnapshotCaptureService::new(
        Arc::clone(&state),
        Arc::new(FsSnapshotStore::new(root.path())),
        Arc::new(FixtureClock::at_fixture_instant()),
    );
    let synchronizer = ShutdownSynchronizer::new(Arc::new(capture), Arc::clone(&state));

    let report = synchronizer.shutdown().await;

    let snapshot = report.snapshot.expect("capture task finished");
    assert_eq!(snapshot.failures.len(), 1);
    assert_eq!(snapshot.written.len(), 2);
    assert_eq!(report.tokens_purged, Some(1));
}
