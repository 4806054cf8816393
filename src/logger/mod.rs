//! Console and file backend for the `log` facade.
//!
//! - `error!`/`warn!` go to stderr, `info!`/`debug!` to stdout, each tagged with `[LEVEL]`.
//! - `file-logging` lets [`init_file_logging`] redirect tagged messages to an append-mode file.
//! - `verbose` enables the [`verbose!`](crate::verbose) printer, which never goes to the log file.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
#[cfg(feature = "verbose")]
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "file-logging")]
use std::{
    fs::{File, OpenOptions},
    io::Write,
    sync::Mutex,
};

/// Level used until the CLI or config says otherwise.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

static LOGGER: ConsoleLogger = ConsoleLogger;
#[cfg(feature = "verbose")]
static VERBOSE_ENABLED: AtomicBool = AtomicBool::new(false);
#[cfg(feature = "file-logging")]
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let prefix = tag(record.level());
        let msg = record.args().to_string();
        if write_to_file(prefix, &msg) {
            return;
        }
        match record.level() {
            Level::Error | Level::Warn => eprintln!("{prefix} {msg}"),
            Level::Info | Level::Debug | Level::Trace => println!("{prefix} {msg}"),
        }
    }

    fn flush(&self) {
        #[cfg(feature = "file-logging")]
        {
            if let Ok(mut log_file) = LOG_FILE.lock() {
                if let Some(file) = log_file.as_mut() {
                    let _ = file.flush();
                }
            }
        }
    }
}

const fn tag(level: Level) -> &'static str {
    match level {
        Level::Error => "[ERROR]",
        Level::Warn => "[WARN]",
        Level::Info => "[INFO]",
        Level::Debug => "[DEBUG]",
        Level::Trace => "[TRACE]",
    }
}

/// Install the logger as the global `log` backend at [`DEFAULT_LEVEL`].
///
/// # Errors
/// Returns an error if another logger was already installed.
pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(DEFAULT_LEVEL);
    Ok(())
}

/// Set the global log level.
pub fn set_level(level: LevelFilter) {
    log::set_max_level(level);
}

/// Parse a level name (case-insensitive). Accepts `off` and the short forms `err`/`warning`.
#[must_use]
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" | "err" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Parse a level name and set it. Returns `true` on success.
#[must_use]
pub fn set_level_from_str(level: &str) -> bool {
    parse_level(level).map(set_level).is_some()
}

#[cfg(feature = "verbose")]
/// Enable verbose output at runtime.
pub fn enable_verbose() {
    VERBOSE_ENABLED.store(true, Ordering::SeqCst);
}
#[cfg(not(feature = "verbose"))]
/// Enable verbose output at runtime (no-op when `verbose` feature is disabled).
pub fn enable_verbose() {}

#[cfg(feature = "verbose")]
/// Returns whether verbose output is enabled.
pub fn is_verbose_enabled() -> bool {
    VERBOSE_ENABLED.load(Ordering::SeqCst)
}
#[cfg(not(feature = "verbose"))]
/// Returns whether verbose output is enabled (always false when feature is disabled).
pub const fn is_verbose_enabled() -> bool {
    false
}

#[cfg(feature = "file-logging")]
#[must_use]
/// Redirect log records to `path` (created if missing, appended otherwise). Returns `true` on success.
pub fn init_file_logging(path: &std::path::Path) -> bool {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .is_ok_and(|file| {
            LOG_FILE.lock().is_ok_and(|mut log_file| {
                *log_file = Some(file);
                true
            })
        })
}

#[cfg(not(feature = "file-logging"))]
#[must_use]
/// Initialize file logging (no-op when `file-logging` feature is disabled).
pub const fn init_file_logging(_path: &std::path::Path) -> bool {
    false
}

/// Returns `true` when the message was consumed by the log file.
#[cfg(feature = "file-logging")]
fn write_to_file(prefix: &str, msg: &str) -> bool {
    LOG_FILE.lock().is_ok_and(|mut log_file| {
        log_file.as_mut().is_some_and(|file| {
            let _ = writeln!(file, "{prefix} {msg}");
            let _ = file.flush();
            true
        })
    })
}

#[cfg(not(feature = "file-logging"))]
const fn write_to_file(_prefix: &str, _msg: &str) -> bool {
    false
}

#[macro_export]
/// Prints an untagged message when verbose output is enabled. Never written to the log file.
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::logger::is_verbose_enabled() {
            println!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_aliases() {
        assert_eq!(parse_level("ERR"), Some(LevelFilter::Error));
        assert_eq!(parse_level("warning"), Some(LevelFilter::Warn));
        assert_eq!(parse_level(" info "), Some(LevelFilter::Info));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn tags_match_levels() {
        assert_eq!(tag(Level::Error), "[ERROR]");
        assert_eq!(tag(Level::Debug), "[DEBUG]");
    }
}
