use anyhow::Result;
use log::LevelFilter;

use linelog::{LogBridge, LogContext, LogStream, Logger, MemoryBuffer, DEFAULT_FILE_MODE};

fn main() -> Result<()> {
    // Leveled calls with {key} interpolation, appended to an owner-private file.
    let path = std::env::temp_dir().join("linelog-quickstart.log");
    let mut logger = Logger::with_file(&path, DEFAULT_FILE_MODE)?;
    println!("appending to {}", path.display());

    let ctx = LogContext::new()
        .with("height", 812_345)
        .with("peer", "10.0.0.7");
    logger.info("synced to height {height} via {peer}", &ctx)?;
    logger.warning("peer {peer} is lagging", &ctx)?;

    // Formatting is pluggable; the formatter receives the interpolated text.
    logger.set_formatter(Some(Box::new(|level, message| {
        format!("{:>9} | {}\n", level.as_str().to_uppercase(), message)
    })));
    logger.notice("switched to a columnar format", &LogContext::new())?;
    logger.close_stream();

    // In-memory capture, handy in tests.
    let buffer = MemoryBuffer::new();
    let mut capture = Logger::with_stream(LogStream::memory(buffer.clone()));
    let detail = LogContext::new().with("detail", "no file involved");
    capture.error("kept in memory: {detail}", &detail)?;
    print!("{}", buffer.text());

    // Route the log facade's macros through this logger for the whole process.
    let mut global = Logger::with_stream(LogStream::stdout());
    global.set_formatter(Some(Box::new(|level, message| {
        format!("({}) {}\n", level, message)
    })));
    LogBridge::install(global, LevelFilter::Debug)?;

    log::info!("facade macros now funnel into the same logger");
    log::debug!("including debug output");

    Ok(())
}
