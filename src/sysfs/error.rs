use std::path::PathBuf;

use crate::fsutil;

/// Errors that cause a single whitelist entry to be skipped.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to stat attribute `{path}`: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Read(#[from] fsutil::FileReadError),
}

impl ReadError {
    /// Returns `true` if the attribute does not exist in the tree.
    pub fn is_not_found(&self) -> bool {
        let kind = match self {
            ReadError::Stat { source, .. } => source.kind(),
            ReadError::Read(err) => err.kind(),
        };
        kind == std::io::ErrorKind::NotFound
    }
}

pub type Result<T> = std::result::Result<T, ReadError>;
