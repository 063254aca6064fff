use std::sync::{Mutex, PoisonError};

use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::context::LogContext;
use crate::level::Level;
use crate::logger::Logger;

/// Adapter exposing a [`Logger`] through the `log` facade, so `log::info!`
/// and friends anywhere in the process funnel into one configured logger.
///
/// The wrapped logger sits behind a mutex; records from concurrent threads
/// are serialized, each one delivered whole.
pub struct LogBridge {
    inner: Mutex<Logger>,
}

impl LogBridge {
    pub fn new(logger: Logger) -> LogBridge {
        LogBridge {
            inner: Mutex::new(logger),
        }
    }

    /// Install `logger` as the process-wide `log` backend and set the
    /// facade's maximum level.
    ///
    /// Fails with [`SetLoggerError`] if a global logger was already
    /// installed; the facade only accepts one per process.
    pub fn install(logger: Logger, max_level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(LogBridge::new(logger)))?;
        log::set_max_level(max_level);
        Ok(())
    }

    /// Run `f` against the wrapped logger, for reconfiguration after the
    /// bridge was built (swap streams, install a formatter).
    pub fn with_logger<T>(&self, f: impl FnOnce(&mut Logger) -> T) -> T {
        let mut logger = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut logger)
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        // Level filtering is the facade's job via log::set_max_level.
        true
    }

    fn log(&self, record: &Record) {
        let level = Level::from(record.level());
        // Delivery problems must not propagate into instrumented code.
        let _ = self.with_logger(|logger| {
            logger.log(level.as_str(), record.args(), &LogContext::new())
        });
    }

    fn flush(&self) {
        // Records are flushed as they are written.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Formatter;
    use crate::stream::{LogStream, MemoryBuffer};

    fn tagged_formatter() -> Formatter {
        Box::new(|level, message| format!("{}|{}\n", level, message))
    }

    #[test]
    fn test_bridge_forwards_records() {
        let buffer = MemoryBuffer::new();
        let mut logger = Logger::with_stream(LogStream::memory(buffer.clone()));
        logger.set_formatter(Some(tagged_formatter()));
        let bridge = LogBridge::new(logger);

        log::Log::log(
            &bridge,
            &Record::builder()
                .args(format_args!("block {} indexed", 7))
                .level(log::Level::Warn)
                .target("bridge_test")
                .build(),
        );

        assert_eq!(buffer.text(), "warning|block 7 indexed\n");
    }

    #[test]
    fn test_facade_levels_map_to_syslog_names() {
        let buffer = MemoryBuffer::new();
        let mut logger = Logger::with_stream(LogStream::memory(buffer.clone()));
        logger.set_formatter(Some(Box::new(|level, _| format!("{}\n", level))));
        let bridge = LogBridge::new(logger);

        for level in [
            log::Level::Error,
            log::Level::Warn,
            log::Level::Info,
            log::Level::Debug,
            log::Level::Trace,
        ] {
            log::Log::log(
                &bridge,
                &Record::builder().args(format_args!("x")).level(level).build(),
            );
        }

        assert_eq!(buffer.text(), "error\nwarning\ninfo\ndebug\ndebug\n");
    }

    #[test]
    fn test_streamless_bridge_discards_quietly() {
        let bridge = LogBridge::new(Logger::new());

        log::Log::log(
            &bridge,
            &Record::builder()
                .args(format_args!("nowhere to go"))
                .level(log::Level::Info)
                .build(),
        );
        log::Log::flush(&bridge);
    }

    #[test]
    fn test_with_logger_reconfigures_in_place() {
        let buffer = MemoryBuffer::new();
        let bridge = LogBridge::new(Logger::new());

        bridge.with_logger(|logger| {
            logger.set_formatter(Some(tagged_formatter()));
            logger.set_stream(LogStream::memory(buffer.clone()))
        })
        .unwrap();

        log::Log::log(
            &bridge,
            &Record::builder()
                .args(format_args!("late binding"))
                .level(log::Level::Debug)
                .build(),
        );
        assert_eq!(buffer.text(), "debug|late binding\n");
    }
}
