use std::path::Path;

use super::{Error, Result};
use crate::fsutil;

/// Where the agent runs relative to the node it inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Running directly on the host.
    Host,
    /// Running inside a container with the host root mounted somewhere else.
    Container,
}

/// Detects whether the agent runs in a container or on the host.
///
/// The checks run in order and the first positive one wins:
///
/// 1. The PID namespace of `<rootfs>/proc/1` differs from our own.
/// 2. `/proc/self/cgroup` names a container runtime or a container id.
/// 3. A container marker file or the `container` environment variable exists.
///
/// Failing checks are logged as warnings and treated as negative.
pub fn detect_runtime_environment(rootfs: impl AsRef<Path>) -> RuntimeEnvironment {
    let rootfs = rootfs.as_ref();
    if rootfs.join("proc").exists() {
        match is_pid_namespace_isolated(rootfs) {
            Ok(true) => return RuntimeEnvironment::Container,
            Ok(false) => {}
            Err(err) => log::warn!("PID namespace check failed: {}", err),
        }
    }

    match read_self_cgroup() {
        Ok(content) if is_container_cgroup(&content) => return RuntimeEnvironment::Container,
        Ok(_) => {}
        Err(err) => log::warn!("cgroup check failed: {}", err),
    }

    if has_container_markers() {
        return RuntimeEnvironment::Container;
    }

    RuntimeEnvironment::Host
}

fn is_pid_namespace_isolated(rootfs: &Path) -> Result<bool> {
    let read_ns = |path: &Path| {
        std::fs::read_link(path).map_err(|source| Error::ReadSymlink {
            path: path.to_path_buf(),
            source,
        })
    };

    let own = read_ns(Path::new("/proc/self/ns/pid"))?;
    let init = read_ns(&rootfs.join("proc/1/ns/pid"))?;
    Ok(own != init)
}

fn read_self_cgroup() -> Result<String> {
    let content = fsutil::read_bounded("/proc/self/cgroup", 64 * 1024)?;
    Ok(String::from_utf8_lossy(&content).into_owned())
}

/// Returns true if a `/proc/<pid>/cgroup` listing points into a container hierarchy.
fn is_container_cgroup(content: &str) -> bool {
    const RUNTIME_MARKERS: [&str; 4] = ["docker", "kubepods", "containerd", "libpod"];

    content.lines().any(|line| {
        RUNTIME_MARKERS.iter().any(|marker| line.contains(marker))
            || line
                .split('/')
                .any(|part| part.len() >= 32 && part.chars().all(|c| c.is_ascii_hexdigit()))
    })
}

fn has_container_markers() -> bool {
    Path::new("/.dockerenv").exists()
        || Path::new("/run/.containerenv").exists()
        || std::env::var_os("container").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_cgroup_markers() {
        assert!(is_container_cgroup(
            "0::/kubepods.slice/kubepods-burstable.slice/cri-containerd-abc.scope\n"
        ));
        assert!(is_container_cgroup("0::/system.slice/docker-1234.scope\n"));
        assert!(is_container_cgroup(
            "0::/0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef\n"
        ));
    }

    #[test]
    fn test_host_cgroup() {
        assert!(!is_container_cgroup("0::/init.scope\n"));
        assert!(!is_container_cgroup("0::/user.slice/user-1000.slice/session-2.scope\n"));
        assert!(!is_container_cgroup(""));
    }

    #[test]
    fn test_missing_rootfs_proc_skips_namespace_check() {
        let dir = tempfile::tempdir().unwrap();
        // must not panic or error without a proc mount under the rootfs
        let _ = detect_runtime_environment(dir.path());
    }
}
