//! Configuration management for the packager.
//!
//! # Overview
//!
//! The packager uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PACKAGER_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [postgresql]
//! connection_string = "${PACKAGER_PG_CONNECTION_STRING}"
//!
//! [packaging]
//! file_path = "/data/files/"
//! files_per_report = 2
//!
//! [trigger]
//! bind_address = "0.0.0.0:80"
//! interval_seconds = 30
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use packager::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("packager.toml")?;
//! println!("Packaging into {}", config.packaging.file_path);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, Environment, LoggingConfig, ManifestConfig, PackagerConfig,
    PackagingConfig, PostgreSQLConfig, TriggerConfig,
};
pub use secret::{redacted_connection_string, secret_string, SecretString, SecretValue};
