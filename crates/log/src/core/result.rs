//! Result extension traits for configuration I/O

use std::io;
use std::path::Path;

use crate::core::error::{VlogError, VlogResult};

/// Extension trait for `io::Result` on log-file paths
pub trait LogIoResultExt<T> {
    /// Attach the log file path to an I/O error
    ///
    /// # Errors
    ///
    /// Returns [`VlogError::OpenLogFile`] carrying `path` and the original error
    fn with_path(self, path: &Path) -> VlogResult<T>;
}

impl<T> LogIoResultExt<T> for io::Result<T> {
    fn with_path(self, path: &Path) -> VlogResult<T> {
        self.map_err(|source| VlogError::OpenLogFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_path() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "test"));
        let err = result.with_path(Path::new("missing/vlog.log")).unwrap_err();

        match err {
            VlogError::OpenLogFile { path, source } => {
                assert_eq!(path, Path::new("missing/vlog.log"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
