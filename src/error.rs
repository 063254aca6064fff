use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors surfaced by the logger.
///
/// Configuration mistakes come back as `Err` from the call that made them:
/// a level name outside the fixed set, a closed handle passed to the stream
/// setter, or a log file that could not be prepared. Write failures never
/// do; `Logger::log` reports those through its sentinel return value so
/// logging stays best-effort for the caller.
#[derive(Debug)]
pub enum LogError {
    /// Level name outside the fixed severity set.
    UnsupportedLevel(String),
    /// The stream setter was handed a handle that is no longer open.
    ClosedStream,
    /// The log file was missing and could not be created.
    CreateFailed { path: PathBuf, source: io::Error },
    /// Permissions could not be set on a freshly created log file.
    PermissionsFailed { path: PathBuf, source: io::Error },
    /// The log file could not be opened for appending.
    OpenFailed { path: PathBuf, source: io::Error },
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedLevel(name) => write!(f, "Unsupported log level \"{}\"", name),
            Self::ClosedStream => write!(f, "Stream handle is closed and cannot be written to"),
            Self::CreateFailed { path, source } => {
                write!(f, "Unable to create log file \"{}\": {}", path.display(), source)
            }
            Self::PermissionsFailed { path, source } => {
                write!(
                    f,
                    "Unable to set permissions for log file \"{}\": {}",
                    path.display(),
                    source
                )
            }
            Self::OpenFailed { path, source } => {
                write!(
                    f,
                    "Could not open log file \"{}\" for appending: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateFailed { source, .. }
            | Self::PermissionsFailed { source, .. }
            | Self::OpenFailed { source, .. } => Some(source),
            Self::UnsupportedLevel(_) | Self::ClosedStream => None,
        }
    }
}

impl LogError {
    /// True for the invalid-argument class: a programmer error in how the
    /// logger was called, as opposed to an environment failure on the file
    /// system.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::UnsupportedLevel(_) | Self::ClosedStream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = LogError::UnsupportedLevel("illegal".to_string());
        assert_eq!(err.to_string(), "Unsupported log level \"illegal\"");

        let err = LogError::OpenFailed {
            path: PathBuf::from("/var/log/app.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(err.to_string().contains("/var/log/app.log"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_invalid_argument_class() {
        assert!(LogError::UnsupportedLevel("x".to_string()).is_invalid_argument());
        assert!(LogError::ClosedStream.is_invalid_argument());

        let io_backed = LogError::CreateFailed {
            path: PathBuf::from("/tmp/x.log"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert!(!io_backed.is_invalid_argument());
    }

    #[test]
    fn test_source_only_on_io_backed_variants() {
        assert!(LogError::ClosedStream.source().is_none());

        let io_backed = LogError::PermissionsFailed {
            path: PathBuf::from("/tmp/x.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "chmod refused"),
        };
        assert!(io_backed.source().is_some());
    }
}
