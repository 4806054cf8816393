//! Integration tests for logger behavior.

use immunograph::logger::{parse_level, set_level, set_level_from_str};
use log::{debug, error, info, warn, LevelFilter};

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("warn"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
    assert_eq!(parse_level("loud"), None);
}

#[test]
fn logs_do_not_panic() {
    let _ = immunograph::logger::init();
    set_level(LevelFilter::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration");
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_writes_to_file() {
    use immunograph::logger::init_file_logging;

    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let log_path = temp_dir.path().join("immunograph.log");

    let _ = immunograph::logger::init();
    assert!(init_file_logging(&log_path));
    // Other tests change the level concurrently; errors pass every level they set
    error!("file logging integration");
    log::logger().flush();

    let content = std::fs::read_to_string(&log_path).expect("Failed to read log file");
    assert!(content.contains("[ERROR] file logging integration"));
}
