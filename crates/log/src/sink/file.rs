//! Log file sink with size-bounded truncation

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use super::Sink;
use crate::core::{LogIoResultExt, VlogResult};
use crate::level::Severity;

#[derive(Debug, Default)]
struct FileState {
    path: Option<PathBuf>,
    file: Option<File>,
    max_size: u64,
}

/// The file facility's sink
///
/// Holds the recorded path (kept even when opening it failed), the open handle
/// and the rotation limit. Before each write the current size is checked; once
/// it exceeds the limit the file is truncated in place and the write starts
/// over at offset zero. A limit of 0 disables rotation.
#[derive(Debug, Default)]
pub struct FileSink {
    state: Mutex<FileState>,
    open: AtomicBool,
}

impl FileSink {
    /// Closed sink with no recorded path
    pub fn new() -> Self {
        Self::default()
    }

    /// Close any current file, record `path` and open it for appending
    ///
    /// On failure the path stays recorded and the sink stays closed.
    pub fn open(&self, path: impl Into<PathBuf>, max_size: u64) -> VlogResult<()> {
        let path = path.into();
        let mut state = self.state.lock();

        state.file = None;
        self.open.store(false, Ordering::Release);
        state.max_size = max_size;
        state.path = Some(path);

        Self::open_recorded(&mut state)?;
        self.open.store(true, Ordering::Release);
        Ok(())
    }

    /// Reopen the recorded path, e.g. after the file was moved away
    ///
    /// Does nothing when no path was ever recorded.
    pub fn reopen(&self) -> VlogResult<()> {
        let mut state = self.state.lock();
        if state.path.is_none() {
            return Ok(());
        }

        state.file = None;
        self.open.store(false, Ordering::Release);
        Self::open_recorded(&mut state)?;
        self.open.store(true, Ordering::Release);
        Ok(())
    }

    /// Close the file, keeping the recorded path
    pub fn close(&self) {
        let mut state = self.state.lock();
        if let Some(file) = state.file.as_mut() {
            let _ = file.flush();
        }
        state.file = None;
        self.open.store(false, Ordering::Release);
    }

    /// Whether a file is currently open
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Most recently configured path
    pub fn path(&self) -> Option<PathBuf> {
        self.state.lock().path.clone()
    }

    /// Rotation limit in bytes, 0 when unbounded
    pub fn max_size(&self) -> u64 {
        self.state.lock().max_size
    }

    fn open_recorded(state: &mut FileState) -> VlogResult<()> {
        let Some(path) = state.path.as_deref() else {
            return Ok(());
        };
        state.file = Some(open_append(path)?);
        Ok(())
    }
}

fn open_append(path: &Path) -> VlogResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_path(path)
}

fn rotate_if_needed(file: &mut File, max_size: u64) -> io::Result<()> {
    if max_size == 0 {
        return Ok(());
    }
    if file.metadata()?.len() > max_size {
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
    }
    Ok(())
}

impl Sink for FileSink {
    fn write_line(&self, _level: Severity, line: &str) -> io::Result<()> {
        let mut state = self.state.lock();
        let max_size = state.max_size;
        let Some(file) = state.file.as_mut() else {
            return Ok(());
        };
        rotate_if_needed(file, max_size)?;
        file.write_all(line.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        match self.state.lock().file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::core::VlogError;

    #[test]
    fn test_open_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "old\n").unwrap();

        let sink = FileSink::new();
        sink.open(&path, 0).unwrap();
        assert!(sink.is_open());
        sink.write_line(Severity::Info, "new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_rotation_truncates_before_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");

        let sink = FileSink::new();
        sink.open(&path, 8).unwrap();
        sink.write_line(Severity::Info, "0123456789\n").unwrap();
        // 11 bytes > 8: the next write starts from an empty file.
        sink.write_line(Severity::Info, "abc\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc\n");

        // 4 bytes <= 8: no rotation.
        sink.write_line(Severity::Info, "def\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc\ndef\n");
    }

    #[test]
    fn test_failed_open_records_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");

        let sink = FileSink::new();
        let err = sink.open(&path, 0).unwrap_err();
        assert!(matches!(err, VlogError::OpenLogFile { .. }));
        assert!(err.raw_os_error().is_some());
        assert!(!sink.is_open());
        assert_eq!(sink.path(), Some(path));

        // Closed sinks swallow writes.
        sink.write_line(Severity::Info, "dropped\n").unwrap();
    }

    #[test]
    fn test_close_then_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let moved = dir.path().join("app.log.1");

        let sink = FileSink::new();
        sink.open(&path, 0).unwrap();
        sink.write_line(Severity::Info, "first\n").unwrap();

        fs::rename(&path, &moved).unwrap();
        sink.reopen().unwrap();
        sink.write_line(Severity::Info, "second\n").unwrap();

        assert_eq!(fs::read_to_string(&moved).unwrap(), "first\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");

        sink.close();
        assert!(!sink.is_open());
        assert_eq!(sink.path(), Some(path));
    }

    #[test]
    fn test_reopen_without_path_is_noop() {
        let sink = FileSink::new();
        sink.reopen().unwrap();
        assert!(!sink.is_open());
    }
}
