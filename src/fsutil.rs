use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Error that occurs when opening or reading a file fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to read file `{path}`: {source}")]
pub struct FileReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FileReadError {
    /// Returns the [`io::ErrorKind`] of the underlying error.
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

/// Opens a file at the given path and wraps it in a [`BufReader`].
///
/// # Errors
///
/// Returns a [`FileReadError`] if the file cannot be opened.
pub fn open_file_reader(path: impl AsRef<Path>) -> Result<BufReader<File>, FileReadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FileReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Reads at most `limit` bytes from the file at the given path.
///
/// The file handle is dropped before returning, whether or not the read succeeded.
///
/// # Errors
///
/// Returns a [`FileReadError`] if the file cannot be opened or read.
///
/// # Example
/// ```no_run
/// # use sysfs_discovery::fsutil;
/// let content = fsutil::read_bounded("/sys/class/power_supply/BAT0/capacity", 4096)?;
/// # Ok::<(), fsutil::FileReadError>(())
/// ```
pub fn read_bounded(path: impl AsRef<Path>, limit: u64) -> Result<Vec<u8>, FileReadError> {
    let path = path.as_ref();
    let to_error = |source| FileReadError {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(to_error)?;
    let mut buf = Vec::with_capacity(64);
    file.take(limit).read_to_end(&mut buf).map_err(to_error)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_bounded_success() {
        let mut tmp = tempfile::NamedTempFile::new().expect("failed to create temp file");
        tmp.write_all(b"87\n").unwrap();
        let content = read_bounded(tmp.path(), 4096).expect("should read test file");
        assert_eq!(content, b"87\n");
    }

    #[test]
    fn test_read_bounded_stops_at_limit() {
        let mut tmp = tempfile::NamedTempFile::new().expect("failed to create temp file");
        tmp.write_all(&[b'a'; 100]).unwrap();
        let content = read_bounded(tmp.path(), 10).unwrap();
        assert_eq!(content.len(), 10);
    }

    #[test]
    fn test_open_file_reader_error() {
        let err = open_file_reader("/definitely/does/not/exist").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/definitely/does/not/exist"));
    }

    #[test]
    fn test_read_bounded_error() {
        let result = read_bounded("/definitely/does/not/exist", 4096);
        let err = result.unwrap_err();
        assert_eq!(err.path, PathBuf::from("/definitely/does/not/exist"));
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
