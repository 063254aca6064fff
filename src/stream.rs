use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::LogError;

/// Conventional permission mode for a freshly created private log file.
pub const DEFAULT_FILE_MODE: u32 = 0o600;

/// Shared backing store for [`LogStream::memory`] sinks.
///
/// Clones share one buffer, so a caller can keep a handle and inspect what
/// the logger wrote without going through the logger itself.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    data: Arc<Mutex<Vec<u8>>>,
}

impl MemoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Snapshot rendered as text. Log output is produced from `&str`
    /// values, so this is lossless in practice.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn append(&self, buf: &[u8]) {
        self.lock().extend_from_slice(buf);
    }

    fn truncate(&self, size: u64) {
        let size = usize::try_from(size).unwrap_or(usize::MAX);
        self.lock().truncate(size);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        // A poisoned buffer is still just bytes; keep it usable.
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
enum Sink {
    File(File),
    Memory(MemoryBuffer),
    Stdout(io::Stdout),
    Stderr(io::Stderr),
    Closed,
}

/// A writable destination for formatted log lines.
///
/// Wraps a file opened for appending, a shared in-memory buffer, or one of
/// the process's standard streams. The handle stays writable until
/// [`LogStream::close`] is called; after that, writes at this layer fail
/// and truncation is a no-op. The logger layers its own no-op-after-close
/// policy on top.
#[derive(Debug)]
pub struct LogStream {
    sink: Sink,
}

impl LogStream {
    /// Open `path` for appending, creating the file first when missing.
    ///
    /// A freshly created file gets `mode` permissions (Unix; elsewhere the
    /// mode is ignored). Fails with [`LogError::CreateFailed`],
    /// [`LogError::PermissionsFailed`] or [`LogError::OpenFailed`] naming
    /// the path; opening a directory path surfaces as `OpenFailed`.
    pub fn append(path: impl AsRef<Path>, mode: u32) -> Result<LogStream, LogError> {
        let path = path.as_ref();
        create_if_missing(path, mode)?;

        match OpenOptions::new().append(true).open(path) {
            Ok(file) => Ok(LogStream::from_file(file)),
            Err(source) => Err(LogError::OpenFailed {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Wrap an already opened file handle.
    ///
    /// The handle should be writable; note that only append-mode files keep
    /// the write-after-truncate behavior documented on
    /// [`truncate`](LogStream::truncate).
    pub fn from_file(file: File) -> LogStream {
        LogStream {
            sink: Sink::File(file),
        }
    }

    /// Sink writing into `buffer`. Keep a clone of the buffer to inspect
    /// the output.
    pub fn memory(buffer: MemoryBuffer) -> LogStream {
        LogStream {
            sink: Sink::Memory(buffer),
        }
    }

    /// Sink writing to the process's standard output.
    pub fn stdout() -> LogStream {
        LogStream {
            sink: Sink::Stdout(io::stdout()),
        }
    }

    /// Sink writing to the process's standard error.
    pub fn stderr() -> LogStream {
        LogStream {
            sink: Sink::Stderr(io::stderr()),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.sink, Sink::Closed)
    }

    /// Kind tag used by the `<resource:...>` context rendering: every open
    /// sink is a `stream`, a closed one reports `closed`.
    pub fn resource_kind(&self) -> &'static str {
        match self.sink {
            Sink::Closed => "closed",
            _ => "stream",
        }
    }

    /// Truncate the underlying resource to `size` bytes.
    ///
    /// Meaningful for file and memory sinks. Standard streams and closed
    /// handles ignore the call. File sinks opened through this crate are in
    /// append mode, so the next write lands at the new end of file rather
    /// than at a stale offset.
    pub fn truncate(&mut self, size: u64) -> io::Result<()> {
        match &mut self.sink {
            Sink::File(file) => file.set_len(size),
            Sink::Memory(buffer) => {
                buffer.truncate(size);
                Ok(())
            }
            Sink::Stdout(_) | Sink::Stderr(_) | Sink::Closed => Ok(()),
        }
    }

    /// Close the stream in place. A file descriptor is released
    /// immediately; the handle itself remains, marked closed.
    pub fn close(&mut self) {
        self.sink = Sink::Closed;
    }
}

impl Write for LogStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::File(file) => file.write(buf),
            Sink::Memory(buffer) => {
                buffer.append(buf);
                Ok(buf.len())
            }
            Sink::Stdout(out) => out.write(buf),
            Sink::Stderr(err) => err.write(buf),
            Sink::Closed => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "log stream is closed",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::File(file) => file.flush(),
            Sink::Memory(_) | Sink::Closed => Ok(()),
            Sink::Stdout(out) => out.flush(),
            Sink::Stderr(err) => err.flush(),
        }
    }
}

impl fmt::Display for LogStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<resource:{}>", self.resource_kind())
    }
}

/// Touch the file with the requested mode if it does not already exist.
fn create_if_missing(path: &Path, mode: u32) -> Result<(), LogError> {
    if path.exists() {
        return Ok(());
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {}
        // Lost a race against another creator; the file exists now.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(()),
        Err(source) => {
            return Err(LogError::CreateFailed {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    set_mode(path, mode)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), LogError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|source| {
        LogError::PermissionsFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), LogError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_sink_collects_writes() {
        let buffer = MemoryBuffer::new();
        let mut stream = LogStream::memory(buffer.clone());

        stream.write_all(b"first ").unwrap();
        stream.write_all(b"second").unwrap();
        stream.flush().unwrap();

        assert_eq!(buffer.text(), "first second");
        assert_eq!(buffer.len(), 12);
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_memory_truncate() {
        let buffer = MemoryBuffer::new();
        let mut stream = LogStream::memory(buffer.clone());

        stream.write_all(b"0123456789").unwrap();
        stream.truncate(4).unwrap();
        assert_eq!(buffer.text(), "0123");

        stream.truncate(0).unwrap();
        assert!(buffer.is_empty());

        stream.write_all(b"after").unwrap();
        assert_eq!(buffer.text(), "after");
    }

    #[test]
    fn test_append_creates_file_with_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");

        let mut stream = LogStream::append(&path, DEFAULT_FILE_MODE).unwrap();
        assert!(path.exists());
        assert!(stream.is_open());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        stream.write_all(b"line\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line\n");
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "old\n").unwrap();

        let mut stream = LogStream::append(&path, 0o644).unwrap();
        stream.write_all(b"new\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_append_to_directory_path_fails_open() {
        let dir = TempDir::new().unwrap();
        let err = LogStream::append(dir.path(), DEFAULT_FILE_MODE).unwrap_err();
        match err {
            LogError::OpenFailed { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("expected OpenFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_file_truncate_then_write_lands_at_start() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");

        let mut stream = LogStream::append(&path, DEFAULT_FILE_MODE).unwrap();
        stream.write_all(b"first payload\n").unwrap();
        stream.truncate(0).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        stream.write_all(b"second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn test_closed_stream_rejects_writes() {
        let mut stream = LogStream::memory(MemoryBuffer::new());
        stream.close();

        assert!(!stream.is_open());
        assert_eq!(stream.resource_kind(), "closed");
        let err = stream.write(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        // Truncate and flush stay quiet on a closed handle.
        stream.truncate(0).unwrap();
        stream.flush().unwrap();
    }

    #[test]
    fn test_resource_display_tag() {
        let stream = LogStream::memory(MemoryBuffer::new());
        assert_eq!(stream.to_string(), "<resource:stream>");

        let mut closed = LogStream::stdout();
        closed.close();
        assert_eq!(closed.to_string(), "<resource:closed>");
    }
}
