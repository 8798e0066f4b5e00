//! Filesystem helpers for the planner database and seed files, built on
//! `cap-std` and `camino`.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::Component;

/// Split `path` into its ambient parent directory and its file name.
fn parent_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, &str)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Read a UTF-8 text file, such as a seed dataset.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = parent_and_name(path)?;
    dir.read_to_string(name)
}

/// Whether `path` exists and is a regular file.
///
/// A missing parent directory surfaces as [`io::ErrorKind::NotFound`].
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = parent_and_name(path)?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Create every missing directory above `path` so a database file can be
/// opened there.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (root, relative) = split_root(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&root, ambient_authority())?.create_dir_all(&relative)
}

/// Separate the filesystem root (or `.` for relative paths) from the rest of
/// `dir`, since capability handles only accept relative paths.
fn split_root(dir: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    let mut components = dir.as_std_path().components();
    let root = match components.next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            // Drive prefixes are followed by the root separator.
            if matches!(components.clone().next(), Some(Component::RootDir)) {
                components.next();
            }
            Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => return Ok((Utf8PathBuf::from("."), dir.to_path_buf())),
    };
    let relative = Utf8PathBuf::from_path_buf(components.as_path().to_path_buf())
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;
    Ok((root, relative))
}
