//! Mountinfo line parser.
//!
//! Lines follow the format described in
//! [`proc_pid_mountinfo(5)`](https://man7.org/linux/man-pages/man5/proc_pid_mountinfo.5.html):
//!
//! ```text
//! 36 25 0:32 / /sys rw,nosuid,nodev,noexec,relatime shared:7 - sysfs sysfs rw
//! ```
//!
//! Only the fields needed to locate a mount are kept.

/// The fields of a mountinfo line used to locate a filesystem.
#[derive(Debug, PartialEq, Eq)]
pub struct MountEntry<'a> {
    /// Root of the mount within the filesystem.
    pub root: &'a str,
    /// Mount point relative to the process's root.
    pub mount_point: &'a str,
    /// Filesystem type (e.g., `sysfs`, `cgroup2`).
    pub fs_type: &'a str,
    /// Source of the mount.
    pub source: &'a str,
}

/// Positional fields of a mountinfo line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountField {
    MountId,
    ParentId,
    MajorMinor,
    Root,
    MountPoint,
    FsType,
    Source,
}

impl std::fmt::Display for MountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MountField::MountId => "mount_id",
            MountField::ParentId => "parent_id",
            MountField::MajorMinor => "major:minor",
            MountField::Root => "root",
            MountField::MountPoint => "mount_point",
            MountField::FsType => "fs_type",
            MountField::Source => "source",
        };
        f.write_str(name)
    }
}

/// Errors that may occur when parsing a mountinfo line.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("missing separator ` - ` in line: `{0}`")]
    MissingSeparator(String),

    #[error("missing `{field}` in line: `{line}`")]
    MissingField { field: MountField, line: String },
}

/// Parses a single mountinfo line without allocating.
///
/// # Errors
///
/// Returns [`ParseError::MissingSeparator`] if the optional-field separator is absent and
/// [`ParseError::MissingField`] if a required field is missing on either side of it.
///
/// # Examples
///
/// ```
/// # use sysfs_discovery::mountinfo::parse_mount_entry;
/// let entry = parse_mount_entry("36 25 0:32 / /sys rw shared:7 - sysfs sysfs rw").unwrap();
/// assert_eq!(entry.mount_point, "/sys");
/// assert_eq!(entry.fs_type, "sysfs");
/// ```
pub fn parse_mount_entry(line: &str) -> Result<MountEntry<'_>, ParseError> {
    let (pre, post) = line
        .split_once(" - ")
        .ok_or_else(|| ParseError::MissingSeparator(line.trim_end().to_owned()))?;

    let missing = |field| ParseError::MissingField {
        field,
        line: line.trim_end().to_owned(),
    };

    let mut pre_fields = pre.split_whitespace();
    for field in [MountField::MountId, MountField::ParentId, MountField::MajorMinor] {
        pre_fields.next().ok_or_else(|| missing(field))?;
    }
    let root = pre_fields.next().ok_or_else(|| missing(MountField::Root))?;
    let mount_point = pre_fields
        .next()
        .ok_or_else(|| missing(MountField::MountPoint))?;

    let mut post_fields = post.split_whitespace();
    let fs_type = post_fields
        .next()
        .ok_or_else(|| missing(MountField::FsType))?;
    let source = post_fields
        .next()
        .ok_or_else(|| missing(MountField::Source))?;

    Ok(MountEntry {
        root,
        mount_point,
        fs_type,
        source,
    })
}
