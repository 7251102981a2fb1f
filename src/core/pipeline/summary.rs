//! Run summaries and handles
//!
//! A run is never persisted; it exists only as a [`RunHandle`] while its
//! reports are being packaged, and as a [`RunSummary`] once they are done.

use super::outcome::FailureReason;
use crate::domain::{PackageId, PackagerError, ReportStatus, ReportUri, Result};
use serde::Serialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Result of one report within a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportOutcome {
    /// The report
    pub report: ReportUri,

    /// Status the report was left in; `None` if it was never claimed
    pub final_status: Option<ReportStatus>,

    /// Registered package, when packaged
    pub package: Option<PackageId>,

    /// Failure reason, when the attempt failed
    pub failure: Option<FailureReason>,
}

impl ReportOutcome {
    /// A report packaged and registered
    pub fn packaged(report: ReportUri, package: PackageId) -> Self {
        Self {
            report,
            final_status: Some(ReportStatus::Packaged),
            package: Some(package),
            failure: None,
        }
    }

    /// A failed attempt, with the status the report was left in
    pub fn failed(
        report: ReportUri,
        final_status: Option<ReportStatus>,
        reason: FailureReason,
    ) -> Self {
        Self {
            report,
            final_status,
            package: None,
            failure: Some(reason),
        }
    }

    /// Whether the report ended packaged
    pub fn is_packaged(&self) -> bool {
        self.final_status == Some(ReportStatus::Packaged)
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Run identifier, as logged
    pub run_id: String,

    /// Eligible reports discovered by the trigger
    pub discovered: usize,

    /// Reports claimed (moved to Processing) by this run
    pub claimed: usize,

    /// Reports skipped because another run claimed them first
    pub skipped: usize,

    /// Reports packaged
    pub packaged: usize,

    /// Reports whose attempt failed, including claim failures
    pub failed: usize,

    /// Failed reports left in Processing because the failure status could not
    /// be written
    pub stranded: usize,

    /// Per-report results, in completion order
    pub outcomes: Vec<ReportOutcome>,

    /// Wall-clock duration of the run
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl RunSummary {
    /// Create an empty summary for a run over `discovered` reports
    pub fn new(run_id: impl Into<String>, discovered: usize) -> Self {
        Self {
            run_id: run_id.into(),
            discovered,
            ..Self::default()
        }
    }

    /// Record the result of one report
    pub fn record(&mut self, outcome: ReportOutcome) {
        if outcome.is_packaged() {
            self.packaged += 1;
        } else {
            self.failed += 1;
            if outcome.final_status == Some(ReportStatus::Processing) {
                self.stranded += 1;
            }
        }
        self.outcomes.push(outcome);
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether every attempted report was packaged
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

/// Handle to a run in flight
///
/// Dropping the handle detaches the run; it keeps going in the background.
#[derive(Debug)]
pub struct RunHandle {
    run_id: Uuid,
    report_count: usize,
    task: JoinHandle<RunSummary>,
}

impl RunHandle {
    pub(crate) fn new(run_id: Uuid, report_count: usize, task: JoinHandle<RunSummary>) -> Self {
        Self {
            run_id,
            report_count,
            task,
        }
    }

    /// Run identifier
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Number of eligible reports the run was started with
    pub fn report_count(&self) -> usize {
        self.report_count
    }

    /// Whether every report task has completed
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for every report of the run to reach a final state
    ///
    /// # Errors
    ///
    /// Returns an error if the dispatcher task panicked or was cancelled.
    pub async fn wait(self) -> Result<RunSummary> {
        self.task
            .await
            .map_err(|e| PackagerError::Other(format!("Run {} did not complete: {e}", self.run_id)))
    }
}

/// What a trigger did
#[derive(Debug)]
pub enum TriggerOutcome {
    /// Eligible reports were found and a run was started
    Accepted(RunHandle),
    /// A report is already Processing; nothing was touched
    AlreadyRunning,
    /// No eligible reports
    NothingToDo,
}
