//! Port for snapshot file storage.
//!
//! The store owns the directory layout: one directory per family under a
//! configured root, files named by [`SnapshotSeries::file_name`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{SnapshotSeries, SnapshotTimestamp};

use super::define_port_error;

define_port_error! {
    /// Filesystem errors raised by snapshot stores.
    pub enum SnapshotStoreError {
        /// A snapshot with the same name already exists.
        AlreadyExists { path: PathBuf } => "snapshot {path:?} already exists",
        /// The file or directory could not be accessed.
        Io { path: PathBuf, message: String } => "snapshot I/O failed for {path:?}: {message}",
    }
}

/// Port for writing, locating and reading snapshot files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Write a new snapshot for `series` taken at `timestamp`.
    ///
    /// Creates the family directory when needed and never overwrites an
    /// existing file. Returns the path written.
    async fn write(
        &self,
        series: SnapshotSeries,
        timestamp: SnapshotTimestamp,
        contents: Vec<u8>,
    ) -> Result<PathBuf, SnapshotStoreError>;

    /// Locate the latest snapshot of `series`.
    ///
    /// A missing or empty family directory yields `Ok(None)`.
    async fn latest(&self, series: SnapshotSeries) -> Result<Option<PathBuf>, SnapshotStoreError>;

    /// Read a snapshot-format file. `path` may lie outside the store root,
    /// which is how operator import files are read.
    async fn read(&self, path: &Path) -> Result<Vec<u8>, SnapshotStoreError>;
}
