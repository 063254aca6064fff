//! Small leveled logger with `{key}` placeholder interpolation, pluggable
//! formatting/output and append-only file streams.
//!
//! ```
//! use linelog::{LogContext, Logger, LogStream, MemoryBuffer};
//!
//! let buffer = MemoryBuffer::new();
//! let mut logger = Logger::with_stream(LogStream::memory(buffer.clone()));
//!
//! let ctx = LogContext::new().with("user", "mira").with("attempt", 3);
//! logger.warning("login failed for {user} (attempt {attempt})", &ctx)?;
//!
//! assert!(buffer.text().contains("(warning) login failed for mira (attempt 3)"));
//! # Ok::<(), linelog::LogError>(())
//! ```
//!
//! File-backed logging goes through [`Logger::with_file`], which creates the
//! file owner-private when missing and appends to it. Process-wide capture of
//! `log::info!` and friends goes through [`LogBridge::install`].

pub mod bridge;
pub mod context;
pub mod error;
pub mod level;
pub mod logger;
pub mod stream;
pub mod value;

pub use bridge::LogBridge;
pub use context::LogContext;
pub use error::LogError;
pub use level::Level;
pub use logger::{Formatter, Logger, Outputter, WRITE_FAILED};
pub use stream::{LogStream, MemoryBuffer, DEFAULT_FILE_MODE};
pub use value::LogValue;
