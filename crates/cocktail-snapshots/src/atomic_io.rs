//! Publishing files through a staged temporary file.
//!
//! Contents are written to a hidden sibling, flushed to disk, and only then
//! linked or renamed to the final name. A reader listing the directory never
//! sees a half-written file under its final name.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::error::WriteError;

static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Publish `contents` as `name` inside `dir`, refusing to replace an existing
/// file.
///
/// The final name is created with a hard link from the staged file, which
/// fails atomically when the name is already taken.
///
/// # Errors
///
/// Returns [`WriteError::AlreadyExists`] when `name` exists,
/// [`WriteError::InvalidName`] when `name` is not a plain file name, and
/// [`WriteError::Io`] for any other filesystem failure.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use cap_std::{ambient_authority, fs::Dir};
/// use cocktail_snapshots::{WriteError, write_new};
///
/// let temp = tempfile::tempdir().expect("temp dir");
/// let dir = Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open dir");
/// let name = Utf8Path::new("users-2024-01-01T00:00:00Z.json");
///
/// write_new(&dir, name, b"[]\n").expect("first write");
/// let second = write_new(&dir, name, b"[]\n");
/// assert!(matches!(second, Err(WriteError::AlreadyExists { .. })));
/// ```
pub fn write_new(dir: &Dir, name: &Utf8Path, contents: &[u8]) -> Result<(), WriteError> {
    let file_name = plain_file_name(name)?;
    let staged = stage(dir, file_name, name, contents)?;

    let linked = dir.hard_link(&staged, dir, file_name);
    discard(dir, &staged);
    match linked {
        Ok(()) => {
            sync_directory(dir);
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Err(WriteError::AlreadyExists {
            path: name.to_path_buf(),
        }),
        Err(err) => Err(io_error(name, &err)),
    }
}

/// Publish `contents` as `name` inside `dir`, replacing any existing file.
///
/// # Errors
///
/// Returns [`WriteError::InvalidName`] when `name` is not a plain file name
/// and [`WriteError::Io`] for filesystem failures.
pub fn write_replace(dir: &Dir, name: &Utf8Path, contents: &[u8]) -> Result<(), WriteError> {
    let file_name = plain_file_name(name)?;
    let staged = stage(dir, file_name, name, contents)?;

    if let Err(err) = rename_over(dir, &staged, file_name) {
        discard(dir, &staged);
        return Err(io_error(name, &err));
    }
    sync_directory(dir);
    Ok(())
}

fn plain_file_name(name: &Utf8Path) -> Result<&str, WriteError> {
    let mut components = name.components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(file_name)), None) => Ok(file_name),
        _ => Err(WriteError::InvalidName {
            path: name.to_path_buf(),
        }),
    }
}

fn stage(
    dir: &Dir,
    file_name: &str,
    name: &Utf8Path,
    contents: &[u8],
) -> Result<String, WriteError> {
    let counter = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
    let staged = format!(".{file_name}.{}.{counter}.partial", std::process::id());

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir
        .open_with(&staged, &options)
        .map_err(|err| io_error(name, &err))?;

    let written = file.write_all(contents).and_then(|()| file.sync_all());
    drop(file);
    if let Err(err) = written {
        discard(dir, &staged);
        return Err(io_error(name, &err));
    }
    Ok(staged)
}

#[cfg(windows)]
fn rename_over(dir: &Dir, staged: &str, file_name: &str) -> io::Result<()> {
    match dir.remove_file(file_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(staged, dir, file_name)
}

#[cfg(not(windows))]
fn rename_over(dir: &Dir, staged: &str, file_name: &str) -> io::Result<()> {
    dir.rename(staged, dir, file_name)
}

fn discard(dir: &Dir, staged: &str) {
    if dir.remove_file(staged).is_err() {
        // Leftover staging files are hidden and harmless.
    }
}

fn sync_directory(dir: &Dir) {
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Directory sync is best effort.
    }
}

fn io_error(name: &Utf8Path, err: &io::Error) -> WriteError {
    WriteError::Io {
        path: name.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use cap_std::ambient_authority;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;

    struct Scratch {
        _temp: TempDir,
        dir: Dir,
    }

    #[fixture]
    fn scratch() -> Scratch {
        let temp = match tempfile::tempdir() {
            Ok(temp) => temp,
            Err(err) => panic!("temp dir: {err}"),
        };
        let dir = match Dir::open_ambient_dir(temp.path(), ambient_authority()) {
            Ok(dir) => dir,
            Err(err) => panic!("open temp dir: {err}"),
        };
        Scratch { _temp: temp, dir }
    }

    fn visible_entries(dir: &Dir) -> Vec<String> {
        let Ok(entries) = dir.entries() else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    #[rstest]
    fn write_new_publishes_contents_without_leftovers(scratch: Scratch) {
        let name = Utf8Path::new("bars-2024-01-01T00:00:00Z.json");

        assert!(write_new(&scratch.dir, name, b"[]\n").is_ok());

        assert_eq!(scratch.dir.read(name.as_str()).ok(), Some(b"[]\n".to_vec()));
        assert_eq!(visible_entries(&scratch.dir), vec![name.to_string()]);
    }

    #[rstest]
    fn write_new_keeps_the_original_file(scratch: Scratch) {
        let name = Utf8Path::new("bars-2024-01-01T00:00:00Z.json");
        assert!(write_new(&scratch.dir, name, b"[1]").is_ok());

        let second = write_new(&scratch.dir, name, b"[2]");

        assert!(matches!(second, Err(WriteError::AlreadyExists { .. })));
        assert_eq!(scratch.dir.read(name.as_str()).ok(), Some(b"[1]".to_vec()));
        assert_eq!(visible_entries(&scratch.dir).len(), 1);
    }

    #[rstest]
    fn write_replace_overwrites(scratch: Scratch) {
        let name = Utf8Path::new("cocktailsOutput.json");
        assert!(write_replace(&scratch.dir, name, b"[1]").is_ok());
        assert!(write_replace(&scratch.dir, name, b"[2]").is_ok());

        assert_eq!(scratch.dir.read(name.as_str()).ok(), Some(b"[2]".to_vec()));
    }

    #[rstest]
    #[case("nested/users.json")]
    #[case("../users.json")]
    #[case("")]
    fn rejects_names_that_are_not_plain_files(scratch: Scratch, #[case] raw: &str) {
        let result = write_new(&scratch.dir, Utf8Path::new(raw), b"[]");
        assert!(matches!(result, Err(WriteError::InvalidName { .. })));
    }
}
