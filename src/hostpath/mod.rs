//! Mapping logical host paths onto where they are mounted for this process.
//!
//! On a bare host the sysfs tree lives at `/sys`. Inside a container the host root is
//! bind-mounted (by default at `/rootfs`) and the tree is found below it. Everything
//! that reads the tree goes through a [`PathResolver`] so it never has to know which
//! case applies.
mod environment;
mod error;

pub use environment::{RuntimeEnvironment, detect_runtime_environment};
pub use error::{Error, Result};

use std::path::{Path, PathBuf};

use crate::mountinfo;

/// Maps a logical absolute path inside a tree onto a real filesystem path.
pub trait PathResolver {
    fn resolve(&self, logical: &Path) -> PathBuf;
}

impl<F> PathResolver for F
where
    F: Fn(&Path) -> PathBuf,
{
    fn resolve(&self, logical: &Path) -> PathBuf {
        self(logical)
    }
}

/// A logical tree root backed by a real directory.
///
/// # Examples
///
/// ```
/// # use std::path::{Path, PathBuf};
/// # use sysfs_discovery::hostpath::HostDir;
/// let sysfs = HostDir::new("/rootfs/sys");
/// assert_eq!(sysfs.path("/class/net"), PathBuf::from("/rootfs/sys/class/net"));
/// assert_eq!(sysfs.path("/"), PathBuf::from("/rootfs/sys"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDir {
    root: PathBuf,
}

impl HostDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the real directory backing the tree root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins a logical path, absolute or not, below the real root.
    pub fn path(&self, logical: impl AsRef<Path>) -> PathBuf {
        let logical = logical.as_ref();
        let relative = logical.strip_prefix("/").unwrap_or(logical);
        if relative.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

impl PathResolver for HostDir {
    fn resolve(&self, logical: &Path) -> PathBuf {
        self.path(logical)
    }
}

/// Returns the directory holding the host's root filesystem.
///
/// `rootfs_mount` is where the host root is expected when running in a container; on
/// the host itself the root is `/`.
///
/// # Errors
///
/// Returns [`Error::MissingRootfs`] if a container environment is detected but nothing
/// exists at `rootfs_mount`.
pub fn detect_host_root(rootfs_mount: impl AsRef<Path>) -> Result<PathBuf> {
    let rootfs_mount = rootfs_mount.as_ref();
    match detect_runtime_environment(rootfs_mount) {
        RuntimeEnvironment::Container if !rootfs_mount.exists() => Err(Error::MissingRootfs {
            path: rootfs_mount.to_path_buf(),
        }),
        RuntimeEnvironment::Container => Ok(rootfs_mount.to_path_buf()),
        RuntimeEnvironment::Host => Ok(PathBuf::from("/")),
    }
}

/// Locates the host's sysfs tree below `host_root`.
///
/// The mount point is taken from the init process's mount table; if it cannot be read
/// the conventional `/sys` is used.
pub fn detect_sysfs_dir(host_root: impl AsRef<Path>) -> HostDir {
    let host_root = HostDir::new(host_root.as_ref());
    let mountinfo_path = host_root.path("/proc/1/mountinfo");
    let mount_point = match mountinfo::detect_sysfs_mount_point(&mountinfo_path) {
        Ok(mount_point) => mount_point,
        Err(err) => {
            log::warn!("Failed to detect sysfs mount point, falling back to `/sys`: {err}");
            PathBuf::from("/sys")
        }
    };

    HostDir::new(host_root.path(mount_point))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_dir_joins_logical_paths() {
        let dir = HostDir::new("/host/sys");
        assert_eq!(
            dir.path("/class/power_supply"),
            PathBuf::from("/host/sys/class/power_supply")
        );
        assert_eq!(dir.path("kernel/mm"), PathBuf::from("/host/sys/kernel/mm"));
        assert_eq!(dir.path("/"), PathBuf::from("/host/sys"));
        assert_eq!(
            dir.resolve(Path::new("/block")),
            PathBuf::from("/host/sys/block")
        );
    }

    #[test]
    fn test_closure_resolver() {
        let resolver =
            |logical: &Path| Path::new("/mnt").join(logical.strip_prefix("/").unwrap());
        assert_eq!(
            resolver.resolve(Path::new("/a/b")),
            PathBuf::from("/mnt/a/b")
        );
    }

    #[test]
    fn test_detect_sysfs_dir_from_mountinfo() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("proc/1")).unwrap();
        std::fs::write(
            root.path().join("proc/1/mountinfo"),
            "36 25 0:32 / /host-sys rw,nosuid shared:7 - sysfs sysfs rw\n",
        )
        .unwrap();

        let sysfs = detect_sysfs_dir(root.path());
        assert_eq!(sysfs.root(), root.path().join("host-sys"));
    }

    #[test]
    fn test_detect_sysfs_dir_falls_back_to_sys() {
        let root = tempfile::tempdir().unwrap();
        let sysfs = detect_sysfs_dir(root.path());
        assert_eq!(sysfs.root(), root.path().join("sys"));
    }
}
