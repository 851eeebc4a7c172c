use std::path::PathBuf;

use crate::fsutil;

/// Errors that may occur while locating the host filesystem.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read symlink `{path}`: {source}")]
    ReadSymlink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    FileRead(#[from] fsutil::FileReadError),
    #[error("running in a container, but the host root is not mounted at `{path}`")]
    MissingRootfs { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;
