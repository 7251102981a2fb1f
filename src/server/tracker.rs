//! Tracking of runs started by the trigger surface

use crate::core::pipeline::{RunHandle, RunSummary};
use std::sync::{Arc, Mutex};

/// Keeps the handles of runs started by HTTP or scheduler triggers so they
/// can be awaited on shutdown
#[derive(Debug, Clone, Default)]
pub struct RunTracker {
    runs: Arc<Mutex<Vec<RunHandle>>>,
}

impl RunTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a started run; finished runs are pruned
    pub fn track(&self, handle: RunHandle) {
        match self.runs.lock() {
            Ok(mut runs) => {
                runs.retain(|run| !run.is_finished());
                runs.push(handle);
            }
            Err(e) => {
                tracing::warn!(run_id = %handle.run_id(), error = %e, "Run tracker unavailable, run detached");
            }
        }
    }

    /// Number of tracked runs still in flight
    pub fn in_flight(&self) -> usize {
        self.runs
            .lock()
            .map(|runs| runs.iter().filter(|run| !run.is_finished()).count())
            .unwrap_or(0)
    }

    /// Wait for every tracked run to complete
    pub async fn drain(&self) -> Vec<RunSummary> {
        let handles: Vec<RunHandle> = match self.runs.lock() {
            Ok(mut runs) => runs.drain(..).collect(),
            Err(_) => Vec::new(),
        };

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.wait().await {
                Ok(summary) => summaries.push(summary),
                Err(e) => tracing::error!(error = %e, "Run did not complete cleanly"),
            }
        }
        summaries
    }
}
