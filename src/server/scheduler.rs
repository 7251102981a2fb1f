//! Interval scheduler invoking the packaging trigger

use super::tracker::RunTracker;
use crate::core::pipeline::{ReportPipeline, TriggerOutcome};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Trigger a packaging run every `period` until shutdown is signalled
///
/// The first trigger fires one period after start. Ticks missed while a
/// trigger is slow are skipped.
pub async fn run_scheduler(
    pipeline: ReportPipeline,
    runs: RunTracker,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(interval_seconds = period.as_secs(), "Scheduler started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tracing::debug!("Packaging triggered by scheduler");
                match pipeline.trigger().await {
                    Ok(TriggerOutcome::Accepted(run)) => {
                        tracing::info!(
                            run_id = %run.run_id(),
                            report_count = run.report_count(),
                            "Scheduled packaging run started"
                        );
                        runs.track(run);
                    }
                    Ok(TriggerOutcome::AlreadyRunning) => {
                        tracing::debug!("Scheduled trigger skipped, packaging already running");
                    }
                    Ok(TriggerOutcome::NothingToDo) => {}
                    Err(e) => tracing::error!(error = %e, "Scheduled trigger failed"),
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!("Scheduler stopped");
}
