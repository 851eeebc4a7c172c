use crate::fsutil;

use super::parser::parse_mount_entry;
use super::{Error, Result};
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Detects the sysfs mount point by parsing the given `mountinfo` file.
///
/// # Errors
///
/// See [`detect_mount_point`].
///
/// # Example
///
/// ```no_run
/// use sysfs_discovery::mountinfo::detect_sysfs_mount_point;
///
/// let sysfs = detect_sysfs_mount_point("/proc/1/mountinfo").unwrap();
/// println!("sysfs mounted at: {}", sysfs.display());
/// ```
pub fn detect_sysfs_mount_point(path: impl AsRef<Path>) -> Result<PathBuf> {
    detect_mount_point(path, "sysfs")
}

/// Detects the mount point of the first filesystem of type `fs_type` in a mountinfo file.
///
/// # Errors
///
/// - [`Error::FileOpen`] if the file can't be opened.
/// - [`Error::ReadLine`] if reading from the file fails.
/// - [`Error::Parse`] if parsing any line before the match fails.
/// - [`Error::MissingMount`] if no mount of the requested type is found.
pub fn detect_mount_point(path: impl AsRef<Path>, fs_type: &str) -> Result<PathBuf> {
    let path = path.as_ref();
    let buf = fsutil::open_file_reader(path)?;

    detect_mount_point_from_reader(buf, path, fs_type)
}

fn detect_mount_point_from_reader<R: BufRead>(
    mut reader: R,
    origin: &Path,
    fs_type: &str,
) -> Result<PathBuf> {
    let mut line = String::with_capacity(256);

    while reader
        .read_line(&mut line)
        .map_err(|source| Error::ReadLine {
            path: origin.to_path_buf(),
            source,
        })?
        != 0
    {
        let entry = parse_mount_entry(line.as_str()).map_err(|source| Error::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        if entry.fs_type == fs_type {
            log::debug!(
                "Found `{}` mount point with root `{}`: {}",
                fs_type,
                entry.root,
                entry.mount_point
            );
            return Ok(PathBuf::from(entry.mount_point));
        }

        line.clear();
    }

    Err(Error::MissingMount {
        fs_type: fs_type.to_owned(),
        path: origin.to_path_buf(),
    })
}
