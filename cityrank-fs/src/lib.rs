//! Capability-based file helpers for catalog files, built on `cap-std` and
//! `camino`.
//!
//! Catalogs are read whole and replaced whole. [`write_file_atomically`]
//! writes a sibling temporary file and renames it over the target, so an
//! interrupted write leaves the previous contents in place.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Read, Write};
use std::path::Component;

/// Suffix appended to the target name while an atomic write is in progress.
const TEMP_SUFFIX: &str = ".cityrank-tmp";

/// Open a UTF-8 file path using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole UTF-8 text file.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut file = open_utf8_file(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Open the directory containing `path` and return it with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("'{path}' has no file name")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether `path` is a regular file.
///
/// A missing path surfaces as an [`io::ErrorKind::NotFound`] error.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Create every missing directory above `path`.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base_dir, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Replace the contents of `path` with `contents` in one step.
///
/// The data is written and flushed to `<name>.cityrank-tmp` beside the target,
/// then renamed over it. On failure the temporary file is removed and the
/// original file is untouched.
pub fn write_file_atomically(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_dir_and_file(path)?;
    let temp_name = format!("{name}{TEMP_SUFFIX}");

    let written = write_and_sync(&dir, &temp_name, contents)
        .and_then(|()| dir.rename(temp_name.as_str(), &dir, name.as_str()));
    if written.is_err() {
        // The write error is returned; cleanup failures are ignored.
        let _ = dir.remove_file(temp_name.as_str());
    }
    written
}

fn write_and_sync(dir: &fs_utf8::Dir, name: &str, contents: &[u8]) -> io::Result<()> {
    let mut file = dir.create(name)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Split a directory path into an ambient base directory and a relative
/// remainder that `cap-std` can resolve beneath it.
fn split_base(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let base = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR.to_string())
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string()),
        _ => Utf8PathBuf::from("."),
    };
    let relative = if base.as_str() == "." {
        parent.to_path_buf()
    } else {
        parent
            .strip_prefix(&base)
            .map_err(|_| io::Error::other(format!("failed to strip '{base}' from '{parent}'")))?
            .to_path_buf()
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}
