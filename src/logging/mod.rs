//! Logging and observability
//!
//! Structured logging with:
//! - JSON-formatted file logs with rotation
//! - Human-readable console output
//! - Configurable log levels (overridable through `RUST_LOG`)
//!
//! # Example
//!
//! ```no_run
//! use packager::logging::init_logging;
//! use packager::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Packager started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a packaging run
///
/// # Example
///
/// ```no_run
/// use packager::log_run_start;
///
/// log_run_start!(3);
/// ```
#[macro_export]
macro_rules! log_run_start {
    ($report_count:expr) => {
        tracing::info!(report_count = $report_count, "Starting packaging run");
    };
}

/// Log the completion of a packaging run
///
/// # Example
///
/// ```no_run
/// use packager::log_run_complete;
/// use std::time::Duration;
///
/// log_run_complete!(2, 1, Duration::from_secs(4));
/// ```
#[macro_export]
macro_rules! log_run_complete {
    ($packaged:expr, $failed:expr, $duration:expr) => {
        tracing::info!(
            packaged = $packaged,
            failed = $failed,
            duration_ms = $duration.as_millis(),
            "Packaging run completed"
        );
    };
}

/// Log a report status transition
///
/// # Example
///
/// ```no_run
/// use packager::log_status_transition;
/// use packager::domain::{ReportStatus, ReportUri};
///
/// let uri = ReportUri::new("http://data.lblod.info/bbcdr-reports/1").unwrap();
/// log_status_transition!(&uri, ReportStatus::Packaged);
/// ```
#[macro_export]
macro_rules! log_status_transition {
    ($report:expr, $status:expr) => {
        tracing::info!(
            report = %$report,
            status = %$status,
            "Report status updated"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use packager::log_error_with_context;
/// use packager::domain::PackagerError;
///
/// let error = PackagerError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
