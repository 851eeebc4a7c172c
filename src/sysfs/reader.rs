use std::io::ErrorKind;
use std::path::Path;

use crate::fsutil;

use super::{ReadError, Result};

/// Upper bound for a single attribute read.
///
/// sysfs attributes never expose more than one page; the bound keeps a misconfigured
/// whitelist entry pointing at a character device from reading without limit.
pub const MAX_ATTRIBUTE_BYTES: u64 = 4096;

/// Reads the raw content of the attribute node at `path`.
///
/// Existence is the signal for nodes whose content cannot be disclosed:
///
/// * a directory yields empty content,
/// * a file that exists but cannot be read due to missing permissions yields empty content.
///
/// # Errors
///
/// Returns [`ReadError::Stat`] if the node cannot be stat'ed (including when it does not
/// exist) and [`ReadError::Read`] for any read failure other than a permission error.
pub fn read_attribute(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path).map_err(|source| ReadError::Stat {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.is_dir() {
        return Ok(Vec::new());
    }

    disclosed_content(path, fsutil::read_bounded(path, MAX_ATTRIBUTE_BYTES))
}

fn disclosed_content(
    path: &Path,
    read: std::result::Result<Vec<u8>, fsutil::FileReadError>,
) -> Result<Vec<u8>> {
    match read {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => {
            log::debug!(
                "attribute `{}` is not readable, recording it without content",
                path.display()
            );
            Ok(Vec::new())
        }
        Err(err) => Err(err.into()),
    }
}
