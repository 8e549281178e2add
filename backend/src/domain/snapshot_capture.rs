//! Snapshot capture service.
//!
//! Loads family state through [`StateExporter`], encodes it with the snapshot
//! codec and hands the bytes to a [`SnapshotStore`]. Used by the shutdown
//! synchronizer and the `snapshot-now` operator command.

use std::path::PathBuf;
use std::sync::Arc;

use cocktail_snapshots::CodecError;
use mockable::Clock;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::ports::{SnapshotStore, SnapshotStoreError, StateExportError, StateExporter};
use crate::domain::{SnapshotFamily, SnapshotSeries, SnapshotTimestamp};

/// Errors raised while capturing one snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotCaptureError {
    /// Loading the family state failed.
    #[error("failed to load {family} state: {source}")]
    Export {
        /// Family being captured.
        family: SnapshotFamily,
        /// Underlying port error.
        #[source]
        source: StateExportError,
    },
    /// The state could not be encoded.
    #[error("failed to encode {family} snapshot: {source}")]
    Encode {
        /// Family being captured.
        family: SnapshotFamily,
        /// Underlying codec error.
        #[source]
        source: CodecError,
    },
    /// The snapshot file could not be written.
    #[error("failed to store {family} snapshot: {source}")]
    Store {
        /// Family being captured.
        family: SnapshotFamily,
        /// Underlying store error.
        #[source]
        source: SnapshotStoreError,
    },
}

/// Outcome of a best-effort capture of every family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Timestamp shared by every file of the set.
    pub timestamp: SnapshotTimestamp,
    /// Files written, in capture order.
    pub written: Vec<(SnapshotFamily, PathBuf)>,
    /// Families whose capture failed.
    pub failures: Vec<SnapshotCaptureError>,
}

impl CaptureReport {
    /// True when every family was written.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Service writing snapshot files from live state.
pub struct SnapshotCaptureService<E, S> {
    exporter: Arc<E>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<E, S> SnapshotCaptureService<E, S> {
    /// Create a capture service.
    pub fn new(exporter: Arc<E>, store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            exporter,
            store,
            clock,
        }
    }
}

impl<E, S> SnapshotCaptureService<E, S>
where
    E: StateExporter,
    S: SnapshotStore,
{
    /// Capture one family into `series` at `timestamp`.
    ///
    /// # Errors
    /// Returns [`SnapshotCaptureError`] naming the step that failed.
    pub async fn capture_family(
        &self,
        family: SnapshotFamily,
        series: SnapshotSeries,
        timestamp: SnapshotTimestamp,
    ) -> Result<PathBuf, SnapshotCaptureError> {
        let state = self
            .exporter
            .load(family)
            .await
            .map_err(|source| SnapshotCaptureError::Export { family, source })?;
        let bytes = state
            .encode()
            .map_err(|source| SnapshotCaptureError::Encode { family, source })?;
        let path = self
            .store
            .write(series, timestamp, bytes)
            .await
            .map_err(|source| SnapshotCaptureError::Store { family, source })?;
        info!(%family, path = %path.display(), count = state.len(), "snapshot written");
        Ok(path)
    }

    /// Capture every family with one shared timestamp.
    ///
    /// A failure is logged and recorded; the remaining families are still
    /// attempted.
    pub async fn capture_all(&self) -> CaptureReport {
        let timestamp = SnapshotTimestamp::new(self.clock.utc());
        let mut report = CaptureReport {
            timestamp,
            written: Vec::new(),
            failures: Vec::new(),
        };
        for family in SnapshotFamily::RESTORE_ORDER {
            match self
                .capture_family(family, SnapshotSeries::state(family), timestamp)
                .await
            {
                Ok(path) => report.written.push((family, path)),
                Err(err) => {
                    error!(%family, error = %err, "snapshot capture failed");
                    report.failures.push(err);
                }
            }
        }
        report
    }

    /// Write the cocktail family to the manual export series.
    ///
    /// # Errors
    /// Returns [`SnapshotCaptureError`] naming the step that failed.
    pub async fn export_cocktails(&self) -> Result<PathBuf, SnapshotCaptureError> {
        let timestamp = SnapshotTimestamp::new(self.clock.utc());
        self.capture_family(
            SnapshotFamily::Cocktails,
            SnapshotSeries::COCKTAIL_EXPORT,
            timestamp,
        )
        .await
    }
}
