//! Filesystem snapshot store.
//!
//! Layout under the configured root:
//!
//! ```text
//! {root}/Users/users-2024-06-01T00:00:00Z.json
//! {root}/Bars/bars-2024-06-01T00:00:00Z.json
//! {root}/Cocktails/cocktails-2024-06-01T00:00:00Z.json
//! {root}/Cocktails/cocktails-json-2024-06-02T09:30:00Z.json
//! ```
//!
//! All filesystem work uses `cap-std` directory handles and runs on the
//! blocking pool.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use cocktail_snapshots::{WriteError, write_new};

use crate::domain::ports::{SnapshotStore, SnapshotStoreError};
use crate::domain::{SnapshotSeries, SnapshotTimestamp};

/// Snapshot store rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    root: PathBuf,
}

impl FsSnapshotStore {
    /// Create a store rooted at `root`. Nothing is created until the first
    /// write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn family_dir(&self, series: SnapshotSeries) -> PathBuf {
        self.root.join(series.family().directory())
    }
}

fn io_error(path: &Path, err: &io::Error) -> SnapshotStoreError {
    SnapshotStoreError::io(path, err.to_string())
}

fn write_blocking(
    dir_path: &Path,
    file_name: &str,
    contents: &[u8],
) -> Result<PathBuf, SnapshotStoreError> {
    let target = dir_path.join(file_name);
    Dir::create_ambient_dir_all(dir_path, ambient_authority())
        .map_err(|err| io_error(dir_path, &err))?;
    let dir = Dir::open_ambient_dir(dir_path, ambient_authority())
        .map_err(|err| io_error(dir_path, &err))?;
    match write_new(&dir, Utf8Path::new(file_name), contents) {
        Ok(()) => Ok(target),
        Err(WriteError::AlreadyExists { .. }) => Err(SnapshotStoreError::already_exists(target)),
        Err(err) => Err(SnapshotStoreError::io(target, err.to_string())),
    }
}

fn latest_blocking(
    dir_path: &Path,
    series: SnapshotSeries,
) -> Result<Option<PathBuf>, SnapshotStoreError> {
    let dir = match Dir::open_ambient_dir(dir_path, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_error(dir_path, &err)),
    };
    let mut names = Vec::new();
    for entry in dir.entries().map_err(|err| io_error(dir_path, &err))? {
        let entry = entry.map_err(|err| io_error(dir_path, &err))?;
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(series
        .select_latest(names)
        .map(|name| dir_path.join(name)))
}

fn read_blocking(path: &Path) -> Result<Vec<u8>, SnapshotStoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| SnapshotStoreError::io(path, "path has no file name"))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| io_error(path, &err))?;
    dir.read(file_name).map_err(|err| io_error(path, &err))
}

async fn blocking<T, F>(path: &Path, task: F) -> Result<T, SnapshotStoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SnapshotStoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| SnapshotStoreError::io(path, format!("blocking task failed: {err}")))?
}

#[async_trait]
impl SnapshotStore for FsSnapshotStore {
    async fn write(
        &self,
        series: SnapshotSeries,
        timestamp: SnapshotTimestamp,
        contents: Vec<u8>,
    ) -> Result<PathBuf, SnapshotStoreError> {
        let dir_path = self.family_dir(series);
        let file_name = series.file_name(timestamp);
        let task_dir = dir_path.clone();
        blocking(&dir_path, move || {
            write_blocking(&task_dir, &file_name, &contents)
        })
        .await
    }

    async fn latest(&self, series: SnapshotSeries) -> Result<Option<PathBuf>, SnapshotStoreError> {
        let dir_path = self.family_dir(series);
        let task_dir = dir_path.clone();
        blocking(&dir_path, move || latest_blocking(&task_dir, series)).await
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, SnapshotStoreError> {
        let task_path = path.to_path_buf();
        blocking(path, move || read_blocking(&task_path)).await
    }
}
