//! Serve command implementation
//!
//! Runs the packager as a service: reconciles, then exposes the HTTP trigger
//! and the interval scheduler until shutdown.

use super::{connect_or_report, load_or_report};
use crate::core::pipeline::ReportPipeline;
use crate::server;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the HTTP bind address
    #[arg(long)]
    pub bind: Option<String>,

    /// Disable the interval scheduler; only HTTP triggers start runs
    #[arg(long)]
    pub no_scheduler: bool,

    /// Create the database schema before serving
    #[arg(long)]
    pub migrate: bool,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_or_report(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        if let Some(bind) = &self.bind {
            if bind.parse::<std::net::SocketAddr>().is_err() {
                println!("❌ Invalid bind address: {bind}");
                return Ok(2); // Configuration error exit code
            }
            config.trigger.bind_address = bind.clone();
        }
        if self.no_scheduler {
            config.trigger.scheduler_enabled = false;
        }

        let store = match connect_or_report(&config).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };
        if self.migrate {
            if let Err(e) = store.ensure_schema().await {
                println!("❌ Failed to create schema");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        }

        let pipeline = ReportPipeline::from_config(store, &config.packaging);

        // Must complete before any trigger can be accepted
        if let Err(e) = pipeline.reconcile().await {
            tracing::error!(error = %e, "Startup reconciliation failed");
            println!("❌ Startup reconciliation failed");
            println!("   Error: {e}");
            return Ok(5); // Fatal error exit code
        }

        println!(
            "🚀 Packager listening on {} (POST {})",
            config.trigger.bind_address, config.trigger.path
        );

        let summaries = match server::serve(&config.trigger, pipeline, shutdown_signal).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Server failed");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let failed: usize = summaries.iter().map(|s| s.failed).sum();
        tracing::info!(
            drained_runs = summaries.len(),
            failed,
            "Packager stopped"
        );
        println!("👋 Packager stopped");
        Ok(0)
    }
}
