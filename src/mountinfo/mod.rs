//! Locating filesystem mounts through `/proc/<pid>/mountinfo`.
mod detect;
mod error;
mod parser;

pub use detect::{detect_mount_point, detect_sysfs_mount_point};
pub use error::{Error, Result};
pub use parser::{MountEntry, MountField, ParseError, parse_mount_entry};
