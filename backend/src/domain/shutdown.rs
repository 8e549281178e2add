//! Shutdown synchronisation.
//!
//! The snapshot set is written by a spawned task whose handle is joined
//! before [`ShutdownSynchronizer::shutdown`] returns; session tokens are
//! purged afterwards whatever the snapshot outcome. There is no timeout.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::ports::{SessionTokenRepository, SnapshotStore, StateExporter};
use crate::domain::snapshot_capture::{CaptureReport, SnapshotCaptureService};

/// What the shutdown path achieved. Failures are logged, never escalated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Snapshot outcome, or `None` when the capture task panicked.
    pub snapshot: Option<CaptureReport>,
    /// Tokens purged, or `None` when the purge failed.
    pub tokens_purged: Option<u64>,
}

/// Writes the final snapshot set, then invalidates sessions.
pub struct ShutdownSynchronizer<E, S, T> {
    capture: Arc<SnapshotCaptureService<E, S>>,
    tokens: Arc<T>,
}

impl<E, S, T> ShutdownSynchronizer<E, S, T> {
    /// Create a synchronizer.
    pub fn new(capture: Arc<SnapshotCaptureService<E, S>>, tokens: Arc<T>) -> Self {
        Self { capture, tokens }
    }
}

impl<E, S, T> ShutdownSynchronizer<E, S, T>
where
    E: StateExporter + 'static,
    S: SnapshotStore + 'static,
    T: SessionTokenRepository,
{
    /// Run the shutdown sequence.
    ///
    /// Returns only after the snapshot task has finished.
    pub async fn shutdown(&self) -> ShutdownReport {
        let capture = Arc::clone(&self.capture);
        let handle = tokio::spawn(async move { capture.capture_all().await });

        let snapshot = match handle.await {
            Ok(report) => {
                if report.is_complete() {
                    info!(
                        timestamp = %report.timestamp,
                        count = report.written.len(),
                        "shutdown snapshot complete"
                    );
                } else {
                    warn!(
                        timestamp = %report.timestamp,
                        count = report.written.len(),
                        failed = report.failures.len(),
                        "shutdown snapshot incomplete"
                    );
                }
                Some(report)
            }
            Err(err) => {
                error!(error = %err, "shutdown snapshot task did not complete");
                None
            }
        };

        let tokens_purged = match self.tokens.purge_all().await {
            Ok(count) => {
                info!(count, "session tokens purged");
                Some(count)
            }
            Err(err) => {
                error!(error = %err, "session token purge failed");
                None
            }
        };

        ShutdownReport {
            snapshot,
            tokens_purged,
        }
    }
}
