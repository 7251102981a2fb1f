//! Run command implementation
//!
//! Performs a single packaging run and waits for every report to reach a
//! final state.

use super::{connect_or_report, load_or_report};
use crate::core::pipeline::{ReportPipeline, RunSummary, TriggerOutcome};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Release reports left in processing before running
    ///
    /// Only safe when no other packager process is running.
    #[arg(long)]
    pub reconcile: bool,

    /// Override the number of files a report must have
    #[arg(long)]
    pub files_per_report: Option<usize>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting packaging run");

        let mut config = match load_or_report(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        if let Some(count) = self.files_per_report {
            if count == 0 {
                println!("❌ --files-per-report must be at least 1");
                return Ok(2); // Configuration error exit code
            }
            tracing::info!(files_per_report = count, "Overriding files per report from CLI");
            config.packaging.files_per_report = count;
        }

        let store = match connect_or_report(&config).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };
        let pipeline = ReportPipeline::from_config(store, &config.packaging);

        if self.reconcile {
            if let Err(e) = pipeline.reconcile().await {
                println!("❌ Reconciliation failed");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        }

        let run = match pipeline.trigger().await {
            Ok(TriggerOutcome::Accepted(run)) => run,
            Ok(TriggerOutcome::AlreadyRunning) => {
                println!("⏳ Packaging is already running");
                return Ok(3); // Already running exit code
            }
            Ok(TriggerOutcome::NothingToDo) => {
                println!("✅ Nothing to package");
                return Ok(0);
            }
            Err(e) => {
                println!("❌ Failed to start packaging run");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        println!("📦 Packaging {} report(s)...", run.report_count());
        let summary = tokio::select! {
            summary = run.wait() => summary?,
            _ = shutdown_signal.wait_for(|stop| *stop) => {
                println!("⚠️  Shutdown requested, reports in flight stay processing until reconciled");
                return Ok(5); // Fatal error exit code
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }

        Ok(if summary.is_successful() { 0 } else { 1 })
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Run {} finished in {:.2?}", summary.run_id, summary.duration);
    println!("  Discovered: {}", summary.discovered);
    println!("  Claimed:    {}", summary.claimed);
    println!("  Skipped:    {}", summary.skipped);
    println!("  Packaged:   {}", summary.packaged);
    println!("  Failed:     {}", summary.failed);
    if summary.stranded > 0 {
        println!("  Stranded:   {} (left processing)", summary.stranded);
    }

    let failures: Vec<_> = summary
        .outcomes
        .iter()
        .filter_map(|o| o.failure.as_ref().map(|reason| (&o.report, reason)))
        .collect();
    if !failures.is_empty() {
        println!();
        println!("Failures:");
        for (report, reason) in failures {
            println!("  ❌ {report}: {reason}");
        }
    }
    println!();
}
