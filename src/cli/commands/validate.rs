//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the packager configuration file.

use crate::config::{load_config, redacted_connection_string};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates every section
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  PostgreSQL Connection: {}",
            redacted_connection_string(&config.postgresql.connection_string)
        );
        println!("  Max Connections: {}", config.postgresql.max_connections);
        println!("  SSL Mode: {}", config.postgresql.ssl_mode);
        println!("  File Path: {}", config.packaging.file_path);
        println!("  Files Per Report: {}", config.packaging.files_per_report);
        println!("  Compression Level: {}", config.packaging.compression_level);
        println!(
            "  Manifest: {} / {} ({})",
            config.packaging.manifest.entity,
            config.packaging.manifest.application,
            config.packaging.manifest.flow
        );
        println!(
            "  Trigger: POST {}{}",
            config.trigger.bind_address, config.trigger.path
        );
        if config.trigger.scheduler_enabled {
            println!("  Scheduler: every {}s", config.trigger.interval_seconds);
        } else {
            println!("  Scheduler: disabled");
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_validate_missing_file_returns_config_error() {
        let args = ValidateArgs {};
        let code = args.execute("does-not-exist.toml").await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[postgresql]\nconnection_string = \"postgresql://localhost/reports\""
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
