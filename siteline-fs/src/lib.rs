//! Shared filesystem helpers built on `cap-std` and `camino`.
//!
//! Every helper resolves an ambient base directory once and performs the
//! actual I/O through a capability handle relative to it.
#![forbid(unsafe_code)]

use std::io;
use std::path::Component;
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open the directory containing `path` and return it with the file name.
///
/// # Errors
/// Fails when `path` has no file name or its parent cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Create `dir` and any missing ancestors.
///
/// # Errors
/// Propagates I/O failures from directory creation.
pub fn ensure_dir(dir: &Utf8Path) -> io::Result<()> {
    if dir.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_base(dir)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Ensure the parent directory for `path` exists.
///
/// # Errors
/// Propagates I/O failures from directory creation.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    path.parent().map_or(Ok(()), ensure_dir)
}

/// Report whether `path` exists and is a regular file.
///
/// Missing files and missing parents both count as "no".
///
/// # Errors
/// Propagates I/O failures other than `NotFound`.
pub fn is_regular_file(path: &Utf8Path) -> io::Result<bool> {
    let metadata = open_dir_and_file(path).and_then(|(dir, name)| dir.metadata(name.as_str()));
    match metadata {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Read a UTF-8 file in full.
///
/// # Errors
/// Propagates I/O failures, including `NotFound`.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.read_to_string(name.as_str())
}

/// Read a UTF-8 file, returning `None` when it or its directory is absent.
///
/// # Errors
/// Propagates I/O failures other than `NotFound`.
pub fn read_optional(path: &Utf8Path) -> io::Result<Option<String>> {
    match read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Write `contents` to `path` via a sibling temporary file and a rename.
///
/// Readers see either the previous file or the complete new one. Missing
/// parent directories are created.
///
/// # Errors
/// Propagates I/O failures from directory creation, writing or renaming.
pub fn write_atomic(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_dir_and_file(path)?;
    let staging = staging_name(&name);
    let written = dir
        .write(staging.as_str(), contents)
        .and_then(|()| dir.rename(staging.as_str(), &dir, name.as_str()));
    if written.is_err() {
        // Keep the original error.
        drop(dir.remove_file(staging.as_str()));
    }
    written
}

/// Staging file name unique to this process and call.
fn staging_name(name: &str) -> String {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let sequence = NEXT.fetch_add(1, Ordering::Relaxed);
    format!(".{name}.{}.{sequence}.tmp", std::process::id())
}

/// Split a path into an ambient base directory and the relative remainder.
///
/// Absolute paths resolve from the root (or drive prefix on Windows);
/// relative paths resolve from the current directory.
///
/// # Errors
/// Fails when the base cannot be opened or the path is not valid UTF-8
/// after stripping.
pub fn split_base(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();

    let (base, relative) = match std_path.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_path.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_path.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative =
        Utf8PathBuf::from_path_buf(relative).map_err(|_| io::Error::other("non-UTF-8 path"))?;
    Ok((dir, relative))
}
