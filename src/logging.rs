//! Logging backend
//!
//! A small `log::Log` implementation: level threshold from `RUST_LOG`,
//! local timestamps, colored level tags, everything on stderr so the terminal
//! display keeps stdout to itself.

use crate::error_classifier::LogLevel;
use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::env;
use std::io::Write;

pub fn get_rust_log_level() -> LogLevel {
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    parse_rust_log_level(&rust_log)
}

pub fn parse_rust_log_level(rust_log: &str) -> LogLevel {
    // Handle common RUST_LOG formats
    let level_str = rust_log
        .split(',')
        .next()
        .unwrap_or(rust_log)
        .split('=')
        .next_back()
        .unwrap_or(rust_log)
        .to_lowercase();

    match level_str.as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => LogLevel::Info, // Default to info if parsing fails
    }
}

pub fn should_log(event_level: LogLevel, threshold: LogLevel) -> bool {
    event_level >= threshold
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[1;31m[ERROR]\x1b[0m",
        Level::Warn => "\x1b[1;91m[WARN]\x1b[0m",
        Level::Info => "\x1b[1;36m[INFO]\x1b[0m",
        Level::Debug => "\x1b[1;33m[DEBUG]\x1b[0m",
        Level::Trace => "[TRACE]",
    }
}

struct DashLogger {
    threshold: LogLevel,
}

impl Log for DashLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        should_log(metadata.level().into(), self.threshold)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "{} {} {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level_tag(record.level()),
            record.args()
        );
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the logger. Call once, before any task starts.
pub fn init() -> Result<(), SetLoggerError> {
    let threshold = get_rust_log_level();
    log::set_boxed_logger(Box::new(DashLogger { threshold }))?;
    log::set_max_level(LevelFilter::from(threshold));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rust_log_level() {
        assert_eq!(parse_rust_log_level("debug"), LogLevel::Debug);
        assert_eq!(parse_rust_log_level("info"), LogLevel::Info);
        assert_eq!(parse_rust_log_level("warn"), LogLevel::Warn);
        assert_eq!(parse_rust_log_level("error"), LogLevel::Error);
        assert_eq!(parse_rust_log_level("trace"), LogLevel::Trace);

        // Test with module-specific formats
        assert_eq!(parse_rust_log_level("oled_dash=debug"), LogLevel::Debug);
        assert_eq!(
            parse_rust_log_level("oled_dash=debug,reqwest=info"),
            LogLevel::Debug
        );

        // Test default
        assert_eq!(parse_rust_log_level("invalid"), LogLevel::Info);
    }

    #[test]
    fn test_should_log() {
        assert!(should_log(LogLevel::Error, LogLevel::Debug));
        assert!(should_log(LogLevel::Warn, LogLevel::Warn));
        assert!(!should_log(LogLevel::Debug, LogLevel::Error));
        assert!(!should_log(LogLevel::Info, LogLevel::Error));
    }

    #[test]
    fn test_logger_respects_threshold() {
        let logger = DashLogger {
            threshold: LogLevel::Warn,
        };
        let warn = Metadata::builder().level(Level::Warn).build();
        let info = Metadata::builder().level(Level::Info).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&info));
    }
}
