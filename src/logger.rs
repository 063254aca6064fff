use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use chrono::{Local, SecondsFormat};

use crate::context::LogContext;
use crate::error::LogError;
use crate::level::Level;
use crate::stream::LogStream;

/// Pluggable formatter: produces the final output text from the level and
/// the already-interpolated message.
pub type Formatter = Box<dyn Fn(Level, &str) -> String + Send>;

/// Pluggable outputter: fully owns delivery of the formatted text. The
/// logger's stream handle is passed through, absent (`None`) included.
pub type Outputter = Box<dyn FnMut(Option<&mut LogStream>, &str) + Send>;

/// Sentinel reported by [`Logger::log`] when the default write path failed.
/// A failed write degrades to this value instead of an `Err`; logging is
/// best-effort from the caller's side.
pub const WRITE_FAILED: isize = -1;

/// Leveled logger with placeholder interpolation and pluggable
/// formatting/output.
///
/// A record flows through [`Logger::log`] as: validate level, interpolate
/// `{key}` placeholders from the context, format (default timestamped line
/// or the installed [`Formatter`]), deliver (write-and-flush to the held
/// [`LogStream`], or hand off to the installed [`Outputter`]).
///
/// The logger itself is synchronous and unsynchronized; wrap it in
/// [`LogBridge`](crate::LogBridge) when several threads share one instance.
pub struct Logger {
    stream: Option<LogStream>,
    formatter: Option<Formatter>,
    outputter: Option<Outputter>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("stream", &self.stream)
            .field("formatter", &self.formatter.is_some())
            .field("outputter", &self.outputter.is_some())
            .finish()
    }
}

impl Logger {
    /// Logger with no output stream. Default-path writes are silent no-ops
    /// until a stream is set or an outputter takes over delivery.
    pub fn new() -> Logger {
        Logger {
            stream: None,
            formatter: None,
            outputter: None,
        }
    }

    /// Logger owning the given stream handle.
    pub fn with_stream(stream: LogStream) -> Logger {
        Logger {
            stream: Some(stream),
            formatter: None,
            outputter: None,
        }
    }

    /// Logger appending to the file at `path`, creating it with `mode`
    /// permissions when missing (`0o600` is the usual choice for a private
    /// log file).
    ///
    /// Create, permission-set and open failures each surface here, naming
    /// the path.
    pub fn with_file(path: impl AsRef<Path>, mode: u32) -> Result<Logger, LogError> {
        Ok(Logger::with_stream(LogStream::append(path, mode)?))
    }

    /// Replace the active output handle, returning the previous one.
    ///
    /// The old handle is not closed here; the caller decides what happens
    /// to it. Fails with [`LogError::ClosedStream`] if `stream` is not open
    /// for writing, leaving the active handle unchanged.
    pub fn set_stream(&mut self, stream: LogStream) -> Result<Option<LogStream>, LogError> {
        if !stream.is_open() {
            return Err(LogError::ClosedStream);
        }
        Ok(self.stream.replace(stream))
    }

    /// Detach and return the active handle, leaving the logger streamless.
    pub fn take_stream(&mut self) -> Option<LogStream> {
        self.stream.take()
    }

    /// The held stream handle, if any.
    pub fn stream(&self) -> Option<&LogStream> {
        self.stream.as_ref()
    }

    /// Install a formatter, or restore default formatting with `None`.
    pub fn set_formatter(&mut self, formatter: Option<Formatter>) {
        self.formatter = formatter;
    }

    /// Install an outputter, or restore the default stream-write path with
    /// `None`.
    pub fn set_outputter(&mut self, outputter: Option<Outputter>) {
        self.outputter = outputter;
    }

    /// Log `message` at the named level.
    ///
    /// `level` must be one of the eight fixed names, matched exactly;
    /// anything else fails with [`LogError::UnsupportedLevel`]. The message
    /// is coerced to text via `Display`, then every `{key}` from `context`
    /// is substituted in insertion order (see [`LogContext::interpolate`]).
    /// Without a formatter the output line is
    /// `"[<ISO-8601 local timestamp>] (<level>) <message>\n"`.
    ///
    /// The `Ok` value reports delivery: the byte count written (the full
    /// formatted length when an outputter owns delivery), `0` for the
    /// silent no-op when no open stream is held, or [`WRITE_FAILED`] when
    /// the stream write failed.
    pub fn log(
        &mut self,
        level: &str,
        message: impl fmt::Display,
        context: &LogContext,
    ) -> Result<isize, LogError> {
        let level: Level = level.parse()?;

        let interpolated = context.interpolate(&message.to_string());

        let output = match &self.formatter {
            Some(formatter) => formatter(level, &interpolated),
            None => format!(
                "[{}] ({}) {}\n",
                Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
                level,
                interpolated
            ),
        };

        if let Some(outputter) = &mut self.outputter {
            outputter(self.stream.as_mut(), &output);
            return Ok(output.len() as isize);
        }

        match &mut self.stream {
            Some(stream) if stream.is_open() => {
                match stream.write_all(output.as_bytes()).and_then(|()| stream.flush()) {
                    Ok(()) => Ok(output.len() as isize),
                    Err(_) => Ok(WRITE_FAILED),
                }
            }
            // No stream, or closed by close_stream: the record is dropped.
            _ => Ok(0),
        }
    }

    /// System is unusable.
    pub fn emergency(
        &mut self,
        message: impl fmt::Display,
        context: &LogContext,
    ) -> Result<isize, LogError> {
        self.log(Level::Emergency.as_str(), message, context)
    }

    /// Action must be taken immediately.
    pub fn alert(
        &mut self,
        message: impl fmt::Display,
        context: &LogContext,
    ) -> Result<isize, LogError> {
        self.log(Level::Alert.as_str(), message, context)
    }

    /// Critical conditions.
    pub fn critical(
        &mut self,
        message: impl fmt::Display,
        context: &LogContext,
    ) -> Result<isize, LogError> {
        self.log(Level::Critical.as_str(), message, context)
    }

    /// Runtime errors that need attention but no immediate action.
    pub fn error(
        &mut self,
        message: impl fmt::Display,
        context: &LogContext,
    ) -> Result<isize, LogError> {
        self.log(Level::Error.as_str(), message, context)
    }

    /// Exceptional occurrences that are not errors.
    pub fn warning(
        &mut self,
        message: impl fmt::Display,
        context: &LogContext,
    ) -> Result<isize, LogError> {
        self.log(Level::Warning.as_str(), message, context)
    }

    /// Normal but significant events.
    pub fn notice(
        &mut self,
        message: impl fmt::Display,
        context: &LogContext,
    ) -> Result<isize, LogError> {
        self.log(Level::Notice.as_str(), message, context)
    }

    /// Interesting events.
    pub fn info(
        &mut self,
        message: impl fmt::Display,
        context: &LogContext,
    ) -> Result<isize, LogError> {
        self.log(Level::Info.as_str(), message, context)
    }

    /// Detailed debug information.
    pub fn debug(
        &mut self,
        message: impl fmt::Display,
        context: &LogContext,
    ) -> Result<isize, LogError> {
        self.log(Level::Debug.as_str(), message, context)
    }

    /// Close the held stream in place. No-op if absent or already closed.
    ///
    /// The descriptor is released immediately and the logger keeps the
    /// closed handle: further default-path writes report `0`, nothing is
    /// reopened.
    pub fn close_stream(&mut self) {
        if let Some(stream) = &mut self.stream {
            stream.close();
        }
    }

    /// Truncate the stream's underlying resource to `size` bytes; no-op
    /// without a stream.
    pub fn truncate_stream(&mut self, size: u64) -> io::Result<()> {
        match &mut self.stream {
            Some(stream) => stream.truncate(size),
            None => Ok(()),
        }
    }
}
