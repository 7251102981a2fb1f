//! Reconcile command implementation
//!
//! Releases reports left in processing by a crashed process.

use super::{connect_or_report, load_or_report};
use crate::core::pipeline::ReportPipeline;
use clap::Args;

/// Arguments for the reconcile command
#[derive(Args, Debug)]
pub struct ReconcileArgs {}

impl ReconcileArgs {
    /// Execute the reconcile command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting reconciliation");

        let config = match load_or_report(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let store = match connect_or_report(&config).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let pipeline = ReportPipeline::from_config(store, &config.packaging);
        match pipeline.reconcile().await {
            Ok(0) => {
                println!("✅ No reports left in processing");
                Ok(0)
            }
            Ok(cleared) => {
                println!("✅ Released {cleared} report(s) left in processing");
                Ok(0)
            }
            Err(e) => {
                println!("❌ Reconciliation failed");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }
}
