//! Status command implementation
//!
//! This module implements the `status` command for displaying how many
//! reports are in each packaging state.

use super::{connect_or_report, load_or_report};
use crate::domain::ReportStatus;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print the counts as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking packaging status");

        let config = match load_or_report(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let store = match connect_or_report(&config).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let counts = match store.status_counts().await {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to read report statuses");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&counts)?);
            return Ok(0);
        }

        println!("📊 Packaging Status");
        println!();
        println!("{:<20} {:>10}", "State", "Reports");
        println!("{}", "-".repeat(31));
        println!("{:<20} {:>10}", "eligible", counts.eligible);
        for status in ReportStatus::ALL {
            println!("{:<20} {:>10}", status.to_string(), counts.get(status));
        }
        println!();

        if counts.processing > 0 {
            println!(
                "⚠️  {} report(s) processing. If no packager is running, run 'packager reconcile'.",
                counts.processing
            );
        }
        Ok(0)
    }
}
