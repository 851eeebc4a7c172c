//! Reading whitelisted sysfs attributes and normalizing them into label pairs.
//!
//! A whitelist entry goes through three steps:
//!
//! 1. [`logical_path`] roots and lexically cleans the configured path.
//! 2. The logical path is mapped onto the real mount through a [`PathResolver`] and the
//!    node is read with [`read_attribute`].
//! 3. [`attribute_name`] and [`sanitize_value`] derive the bounded name and value.
//!
//! Entries are relative to the sysfs root; a leading `/sys` segment is dropped.
mod error;
mod name;
mod path;
mod reader;
mod value;

pub use error::{ReadError, Result};
pub use name::{MAX_NAME_LEN, attribute_name};
pub use path::logical_path;
pub use reader::{MAX_ATTRIBUTE_BYTES, read_attribute};
pub use value::{MAX_VALUE_LEN, sanitize_value};

use std::path::Path;

use crate::hostpath::PathResolver;

/// A single attribute read from the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Dotted, bounded attribute name.
    pub name: String,
    /// Sanitized content, empty for directories and unreadable files.
    pub value: String,
}

/// Resolves, reads and normalizes one whitelist entry.
///
/// # Errors
///
/// Returns a [`ReadError`] if the entry does not exist or cannot be read. Directories and
/// permission-denied files are not errors.
///
/// # Examples
///
/// ```no_run
/// # use sysfs_discovery::hostpath::HostDir;
/// # use sysfs_discovery::sysfs;
/// let sysfs_dir = HostDir::new("/sys");
/// let attribute = sysfs::read_entry("class/power_supply/BAT0/capacity", &sysfs_dir)?;
/// println!("{}={}", attribute.name, attribute.value);
/// # Ok::<(), sysfs::ReadError>(())
/// ```
pub fn read_entry(entry: &str, resolver: &impl PathResolver) -> Result<Attribute> {
    let logical = logical_path(entry);
    let content = read_attribute(resolver.resolve(Path::new(&logical)))?;

    Ok(Attribute {
        name: attribute_name(&logical),
        value: sanitize_value(&content),
    })
}
