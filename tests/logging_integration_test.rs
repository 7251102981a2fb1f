//! Integration tests for logging functionality
//!
//! The global subscriber can only be installed once per process, so a single
//! test exercises initialization.

use packager::config::LoggingConfig;
use packager::logging::init_logging;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_path, "/var/log/packager");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_file_logging_writes_json() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "hourly".to_string(),
    };

    let guard = init_logging("debug", &config).unwrap();
    packager::log_run_start!(2);
    packager::log_run_complete!(1, 1, Duration::from_millis(10));
    drop(guard);

    let log_files: Vec<_> = std::fs::read_dir(&log_path)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with("packager.log"))
        })
        .collect();
    assert_eq!(log_files.len(), 1);

    let contents = std::fs::read_to_string(&log_files[0]).unwrap();
    let first_line = contents.lines().next().unwrap();
    let json: serde_json::Value = serde_json::from_str(first_line).unwrap();
    assert_eq!(json["fields"]["message"], "Logging initialized");
}

#[test]
fn test_invalid_level_is_rejected() {
    let config = LoggingConfig {
        local_enabled: false,
        ..LoggingConfig::default()
    };

    assert!(init_logging("verbose", &config).is_err());
}
