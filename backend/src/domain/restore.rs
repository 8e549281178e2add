//! Startup restore of an empty store from the latest snapshots.
//!
//! Two gates decide whether anything is restored:
//! - [`whole_store_is_empty`] guards the full restore of users, bars and
//!   cocktails from their state series;
//! - [`cocktails_are_empty`] guards the cocktails-only bootstrap from the
//!   manual export series.
//!
//! Families are restored parents first, one transaction each. A failed family
//! is reported and the remaining families are still attempted.

use std::path::PathBuf;
use std::sync::Arc;

use cocktail_snapshots::CodecError;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::ports::{
    SnapshotStore, SnapshotStoreError, StateImportError, StateImporter, StateInventory,
    StateInventoryError,
};
use crate::domain::{FamilyState, SnapshotFamily, SnapshotSeries};

/// Progress of a restore attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreState {
    /// Counting rows to decide whether the gate is open.
    CheckingEmpty,
    /// Restoring one family.
    Restoring(SnapshotFamily),
    /// Every attempted family finished without error.
    Done,
    /// The store already held data; nothing was written.
    Skipped,
    /// The emptiness check or at least one family failed.
    Failed,
}

/// Errors raised while restoring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    /// Counting rows failed; the restore attempt was abandoned.
    #[error("emptiness check failed: {0}")]
    EmptyCheck(#[from] StateInventoryError),
    /// Locating or reading the snapshot failed.
    #[error("snapshot store failed: {0}")]
    Store(#[from] SnapshotStoreError),
    /// The snapshot file is malformed.
    #[error("snapshot {path:?} could not be decoded: {source}")]
    Decode {
        /// File that failed to decode.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: CodecError,
    },
    /// The insert transaction was rolled back.
    #[error("restore transaction rolled back: {0}")]
    Transaction(#[from] StateImportError),
}

/// Result of restoring one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyRestoreStatus {
    /// Rows committed from `path`.
    Restored {
        /// Number of top-level rows committed.
        count: usize,
        /// Snapshot the rows came from.
        path: PathBuf,
    },
    /// No snapshot of the family exists.
    NoSnapshot,
    /// The family failed and its transaction, if any, was rolled back.
    Failed(RestoreError),
}

/// Restore outcome for one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyRestore {
    /// Family attempted.
    pub family: SnapshotFamily,
    /// What happened.
    pub status: FamilyRestoreStatus,
}

/// Full account of a restore attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RestoreReport {
    /// States visited, in order. The last entry is terminal.
    pub trail: Vec<RestoreState>,
    /// Per-family outcomes, in restore order.
    pub families: Vec<FamilyRestore>,
    /// Set when the emptiness check itself failed.
    pub gate_error: Option<RestoreError>,
}

impl RestoreReport {
    /// Terminal state of the attempt.
    pub fn outcome(&self) -> RestoreState {
        self.trail.last().copied().unwrap_or(RestoreState::CheckingEmpty)
    }

    /// Rows committed for `family`, or zero.
    pub fn restored(&self, family: SnapshotFamily) -> usize {
        self.families
            .iter()
            .filter(|entry| entry.family == family)
            .map(|entry| match entry.status {
                FamilyRestoreStatus::Restored { count, .. } => count,
                _ => 0,
            })
            .sum()
    }

    fn finish(mut self) -> Self {
        let failed = self.gate_error.is_some()
            || self
                .families
                .iter()
                .any(|entry| matches!(entry.status, FamilyRestoreStatus::Failed(_)));
        self.trail.push(if failed {
            RestoreState::Failed
        } else {
            RestoreState::Done
        });
        self
    }
}

/// Whole-store gate: true only when users, bars and cocktails are all empty.
///
/// # Errors
/// Returns the first count failure.
pub async fn whole_store_is_empty<I>(inventory: &I) -> Result<bool, StateInventoryError>
where
    I: StateInventory + ?Sized,
{
    for family in SnapshotFamily::RESTORE_ORDER {
        if inventory.count(family).await? != 0 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Cocktails-only gate: true when no cocktail rows exist.
///
/// Users and bars are not consulted.
///
/// # Errors
/// Returns the count failure.
pub async fn cocktails_are_empty<I>(inventory: &I) -> Result<bool, StateInventoryError>
where
    I: StateInventory + ?Sized,
{
    Ok(inventory.count(SnapshotFamily::Cocktails).await? == 0)
}

/// Service restoring snapshots into an empty store.
pub struct RestoreOrchestrator<I, S, M> {
    inventory: Arc<I>,
    store: Arc<S>,
    importer: Arc<M>,
}

impl<I, S, M> RestoreOrchestrator<I, S, M> {
    /// Create an orchestrator over the given ports.
    pub fn new(inventory: Arc<I>, store: Arc<S>, importer: Arc<M>) -> Self {
        Self {
            inventory,
            store,
            importer,
        }
    }
}

impl<I, S, M> RestoreOrchestrator<I, S, M>
where
    I: StateInventory,
    S: SnapshotStore,
    M: StateImporter,
{
    /// Restore every family from its state series when the whole store is
    /// empty.
    pub async fn restore_if_empty(&self) -> RestoreReport {
        let mut report = RestoreReport {
            trail: vec![RestoreState::CheckingEmpty],
            ..RestoreReport::default()
        };
        match whole_store_is_empty(self.inventory.as_ref()).await {
            Ok(true) => {}
            Ok(false) => {
                info!("store already holds data; skipping snapshot restore");
                report.trail.push(RestoreState::Skipped);
                return report;
            }
            Err(err) => {
                error!(error = %err, "emptiness check failed; abandoning snapshot restore");
                report.gate_error = Some(err.into());
                return report.finish();
            }
        }

        for family in SnapshotFamily::RESTORE_ORDER {
            report.trail.push(RestoreState::Restoring(family));
            let status = self
                .restore_family(family, SnapshotSeries::state(family))
                .await;
            report.families.push(FamilyRestore { family, status });
        }
        report.finish()
    }

    /// Restore cocktails from the export series when no cocktails exist.
    pub async fn bootstrap_cocktails_if_empty(&self) -> RestoreReport {
        let mut report = RestoreReport {
            trail: vec![RestoreState::CheckingEmpty],
            ..RestoreReport::default()
        };
        match cocktails_are_empty(self.inventory.as_ref()).await {
            Ok(true) => {}
            Ok(false) => {
                info!("cocktails present; skipping cocktail bootstrap");
                report.trail.push(RestoreState::Skipped);
                return report;
            }
            Err(err) => {
                error!(error = %err, "cocktail count failed; abandoning cocktail bootstrap");
                report.gate_error = Some(err.into());
                return report.finish();
            }
        }

        let family = SnapshotFamily::Cocktails;
        report.trail.push(RestoreState::Restoring(family));
        let status = self
            .restore_family(family, SnapshotSeries::COCKTAIL_EXPORT)
            .await;
        report.families.push(FamilyRestore { family, status });
        report.finish()
    }

    async fn restore_family(
        &self,
        family: SnapshotFamily,
        series: SnapshotSeries,
    ) -> FamilyRestoreStatus {
        match self.try_restore_family(family, series).await {
            Ok(Some((count, path))) => {
                info!(%family, path = %path.display(), count, "family restored");
                FamilyRestoreStatus::Restored { count, path }
            }
            Ok(None) => {
                warn!(%family, stem = series.stem(), "no snapshot found; family not restored");
                FamilyRestoreStatus::NoSnapshot
            }
            Err(err) => {
                error!(%family, error = %err, "family restore failed");
                FamilyRestoreStatus::Failed(err)
            }
        }
    }

    async fn try_restore_family(
        &self,
        family: SnapshotFamily,
        series: SnapshotSeries,
    ) -> Result<Option<(usize, PathBuf)>, RestoreError> {
        let Some(path) = self.store.latest(series).await? else {
            return Ok(None);
        };
        let bytes = self.store.read(&path).await?;
        let state = FamilyState::decode(family, &bytes).map_err(|source| RestoreError::Decode {
            path: path.clone(),
            source,
        })?;
        let count = match &state {
            FamilyState::Users(users) => self.importer.insert_users(users).await?,
            FamilyState::Bars(bars) => self.importer.insert_bars(bars).await?,
            FamilyState::Cocktails(cocktails) => self.importer.insert_cocktails(cocktails).await?,
        };
        Ok(Some((count, path)))
    }
}

#[cfg(test)]
#[path = "restore_tests.rs"]
mod tests;
