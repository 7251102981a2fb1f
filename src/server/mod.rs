//! Trigger surface: HTTP endpoint and interval scheduler
//!
//! Both invoke [`ReportPipeline::trigger`]. Runs they start are tracked and
//! awaited on graceful shutdown.

pub mod http;
pub mod scheduler;
pub mod tracker;

pub use http::{trigger_router, AppState, TriggerResponse};
pub use scheduler::run_scheduler;
pub use tracker::RunTracker;

use crate::config::TriggerConfig;
use crate::core::pipeline::{ReportPipeline, RunSummary};
use crate::domain::{PackagerError, Result};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Serve the trigger surface until shutdown is signalled
///
/// Binds the HTTP listener, starts the scheduler when enabled, and on
/// shutdown stops accepting triggers and waits for in-flight runs.
///
/// # Returns
///
/// Summaries of the runs that were still in flight at shutdown
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(
    config: &TriggerConfig,
    pipeline: ReportPipeline,
    shutdown: watch::Receiver<bool>,
) -> Result<Vec<RunSummary>> {
    let runs = RunTracker::new();

    let listener = TcpListener::bind(&config.bind_address).await.map_err(|e| {
        PackagerError::Trigger(format!("Failed to bind {}: {e}", config.bind_address))
    })?;
    tracing::info!(
        bind_address = %config.bind_address,
        path = %config.path,
        "Trigger endpoint listening"
    );

    let scheduler = if config.scheduler_enabled {
        Some(tokio::spawn(run_scheduler(
            pipeline.clone(),
            runs.clone(),
            Duration::from_secs(config.interval_seconds),
            shutdown.clone(),
        )))
    } else {
        tracing::info!("Scheduler disabled");
        None
    };

    let app = trigger_router(AppState::new(pipeline, runs.clone()), &config.path);
    let mut server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.wait_for(|stop| *stop).await;
        })
        .await
        .map_err(|e| PackagerError::Trigger(format!("HTTP server failed: {e}")))?;

    if let Some(scheduler) = scheduler {
        if let Err(e) = scheduler.await {
            tracing::error!(error = %e, "Scheduler task failed");
        }
    }

    let in_flight = runs.in_flight();
    if in_flight > 0 {
        tracing::info!(in_flight, "Waiting for in-flight packaging runs");
    }
    Ok(runs.drain().await)
}
