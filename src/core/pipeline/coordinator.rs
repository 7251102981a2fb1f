//! Report pipeline - orchestrates packaging runs
//!
//! A trigger checks the run guard, fetches eligible reports and hands them to
//! a dispatcher task. The dispatcher claims reports one by one in eligibility
//! order and spawns one task per claimed report. Each task packages its report
//! and applies the resulting status.

use super::outcome::{FailureReason, PackagingOutcome};
use super::packager::ReportPackager;
use super::summary::{ReportOutcome, RunHandle, RunSummary, TriggerOutcome};
use crate::adapters::store::MetadataStore;
use crate::config::PackagingConfig;
use crate::domain::{Package, Report, ReportStatus, Result, StoreError};
use crate::{log_error_with_context, log_run_complete, log_run_start, log_status_transition};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::Instrument;
use uuid::Uuid;

/// Packaging pipeline over a metadata store
#[derive(Clone)]
pub struct ReportPipeline {
    store: Arc<dyn MetadataStore + Send + Sync>,
    packager: Arc<ReportPackager>,
}

impl ReportPipeline {
    /// Create a new pipeline
    pub fn new(store: Arc<dyn MetadataStore + Send + Sync>, packager: ReportPackager) -> Self {
        Self {
            store,
            packager: Arc::new(packager),
        }
    }

    /// Create a pipeline from the packaging configuration
    pub fn from_config(
        store: Arc<dyn MetadataStore + Send + Sync>,
        config: &PackagingConfig,
    ) -> Self {
        Self::new(store, ReportPackager::from_config(config))
    }

    /// Clear stale `Processing` statuses left behind by a previous process
    ///
    /// Must run before the first trigger; otherwise the run guard refuses
    /// every trigger after a crash.
    ///
    /// # Returns
    ///
    /// The number of reports released
    pub async fn reconcile(&self) -> Result<u64> {
        let cleared = self.store.clear_status(ReportStatus::Processing).await?;
        if cleared > 0 {
            tracing::warn!(cleared, "Released reports left in processing by a previous run");
        } else {
            tracing::info!("No stale processing reports found");
        }
        Ok(cleared)
    }

    /// Start a packaging run
    ///
    /// Returns as soon as the run is dispatched. The run guard refuses to start
    /// while any report is `Processing`, without touching the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the guard check or the eligibility fetch fails; no
    /// report is touched in that case.
    pub async fn trigger(&self) -> Result<TriggerOutcome> {
        if self
            .store
            .any_report_in_status(ReportStatus::Processing)
            .await?
        {
            tracing::info!("Packaging already running, trigger ignored");
            return Ok(TriggerOutcome::AlreadyRunning);
        }

        let reports = self.store.find_eligible_reports().await?;
        if reports.is_empty() {
            tracing::debug!("No reports to package");
            return Ok(TriggerOutcome::NothingToDo);
        }

        let run_id = Uuid::new_v4();
        let report_count = reports.len();
        let task = tokio::spawn(
            dispatch(run_id, self.store.clone(), self.packager.clone(), reports)
                .instrument(tracing::info_span!("packaging_run", run_id = %run_id)),
        );

        Ok(TriggerOutcome::Accepted(RunHandle::new(
            run_id,
            report_count,
            task,
        )))
    }
}

/// Claims reports in order and waits for their tasks
async fn dispatch(
    run_id: Uuid,
    store: Arc<dyn MetadataStore + Send + Sync>,
    packager: Arc<ReportPackager>,
    reports: Vec<Report>,
) -> RunSummary {
    let started = Instant::now();
    log_run_start!(reports.len());

    let mut summary = RunSummary::new(run_id.to_string(), reports.len());
    let mut tasks = JoinSet::new();

    for report in reports {
        match store.claim_report(&report.uri).await {
            Ok(true) => {
                log_status_transition!(&report.uri, ReportStatus::Processing);
                summary.claimed += 1;
                let store = store.clone();
                let packager = packager.clone();
                let span = tracing::info_span!("package_report", report_id = %report.id);
                tasks.spawn(process_report(store, packager, report).instrument(span));
            }
            Ok(false) => {
                tracing::debug!(report = %report.uri, "Report claimed by another run, skipping");
                summary.skipped += 1;
            }
            Err(e) => {
                tracing::warn!(report = %report.uri, error = %e, "Failed to claim report");
                summary.record(ReportOutcome::failed(report.uri, None, e.into()));
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => summary.record(outcome),
            Err(e) => {
                // The task's report stays Processing until reconciliation
                log_error_with_context!(&e, "Report task aborted");
                summary.failed += 1;
                summary.stranded += 1;
            }
        }
    }

    let summary = summary.with_duration(started.elapsed());
    log_run_complete!(summary.packaged, summary.failed, summary.duration);
    summary
}

/// Package one claimed report and record the result
async fn process_report(
    store: Arc<dyn MetadataStore + Send + Sync>,
    packager: Arc<ReportPackager>,
    report: Report,
) -> ReportOutcome {
    let outcome = match store.find_files(&report.uri).await {
        Ok(files) => packager.package(&report, &files).await,
        Err(e) => PackagingOutcome::Failed(e.into()),
    };
    apply_outcome(store.as_ref(), &report, outcome).await
}

/// Apply the store side effects of a packaging outcome
///
/// A package is registered before the report is marked packaged. Any error on
/// that path marks the report failed; the already written archive is left in
/// place. Terminal statuses are only written while the report is still
/// `Processing`, so a report finished by another run keeps its status.
pub async fn apply_outcome(
    store: &(dyn MetadataStore + Send + Sync),
    report: &Report,
    outcome: PackagingOutcome,
) -> ReportOutcome {
    match outcome {
        PackagingOutcome::Packaged(package) => {
            match register(store, report, &package).await {
                Ok(()) => {
                    log_status_transition!(&report.uri, ReportStatus::Packaged);
                    ReportOutcome::packaged(report.uri.clone(), package.id)
                }
                Err(e) => {
                    tracing::warn!(
                        report = %report.uri,
                        package = %package.id,
                        location = %package.location,
                        error = %e,
                        "Archive left orphaned after registration failure"
                    );
                    mark_failed(store, report, e.into()).await
                }
            }
        }
        PackagingOutcome::Failed(reason) => mark_failed(store, report, reason).await,
    }
}

async fn register(
    store: &(dyn MetadataStore + Send + Sync),
    report: &Report,
    package: &Package,
) -> std::result::Result<(), StoreError> {
    store.register_package(&report.uri, package).await?;
    let moved = store
        .set_status_from(&report.uri, ReportStatus::Processing, ReportStatus::Packaged)
        .await?;
    if !moved {
        return Err(StoreError::Conflict(format!(
            "report {} is no longer processing",
            report.uri
        )));
    }
    Ok(())
}

async fn mark_failed(
    store: &(dyn MetadataStore + Send + Sync),
    report: &Report,
    reason: FailureReason,
) -> ReportOutcome {
    tracing::warn!(report = %report.uri, reason = %reason, "Packaging failed");

    match store
        .set_status_from(
            &report.uri,
            ReportStatus::Processing,
            ReportStatus::PackagingFailed,
        )
        .await
    {
        Ok(true) => {
            log_status_transition!(&report.uri, ReportStatus::PackagingFailed);
            ReportOutcome::failed(
                report.uri.clone(),
                Some(ReportStatus::PackagingFailed),
                reason,
            )
        }
        Ok(false) => {
            tracing::warn!(
                report = %report.uri,
                "Report no longer processing, status left unchanged"
            );
            ReportOutcome::failed(report.uri.clone(), None, reason)
        }
        Err(e) => {
            tracing::error!(
                report = %report.uri,
                error = %e,
                "Failed to record packaging failure, report stays processing until reconciliation"
            );
            ReportOutcome::failed(report.uri.clone(), Some(ReportStatus::Processing), reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryStore, StoreMutation};
    use crate::adapters::store::StoreOperation;
    use crate::core::archive::{ArchiveBuilder, FileStorage};
    use crate::core::manifest::ManifestBuilder;
    use crate::domain::{PackageId, ReportBuilder, ReportFile};
    use chrono::Utc;

    fn report(n: u32) -> Report {
        ReportBuilder::new()
            .uri(format!("http://data.lblod.info/bbcdr-reports/{n}"))
            .unwrap()
            .id(format!("r-{n}"))
            .unwrap()
            .modified(Utc::now())
            .build()
            .unwrap()
    }

    fn package() -> Package {
        Package {
            id: PackageId::generate(),
            location: "share://r-1-x.zip".to_string(),
            size_bytes: 1,
            checksum: "00".to_string(),
            created_at: Utc::now(),
        }
    }

    fn pipeline(store: Arc<InMemoryStore>, root: &std::path::Path) -> ReportPipeline {
        let packager = ReportPackager::new(
            ManifestBuilder::default(),
            ArchiveBuilder::new(FileStorage::new(root), 9),
            2,
            root,
        );
        ReportPipeline::new(store, packager)
    }

    #[tokio::test]
    async fn test_apply_packaged_registers_then_marks() {
        let store = InMemoryStore::new();
        let r = report(1);
        store.insert_report(r.clone(), vec![]);
        store.claim_report(&r.uri).await.unwrap();
        store.clear_journal();
        let p = package();

        let outcome = apply_outcome(&store, &r, PackagingOutcome::Packaged(p.clone())).await;

        assert!(outcome.is_packaged());
        assert_eq!(
            store.journal(),
            vec![
                StoreMutation::PackageRegistered(r.uri.clone(), p),
                StoreMutation::StatusSet(r.uri.clone(), ReportStatus::Packaged),
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_failed_marks_failed() {
        let store = InMemoryStore::new();
        let r = report(1);
        store.insert_report(r.clone(), vec![]);
        store.claim_report(&r.uri).await.unwrap();

        let outcome = apply_outcome(
            &store,
            &r,
            PackagingOutcome::Failed(FailureReason::FileCountMismatch {
                expected: 2,
                actual: 0,
            }),
        )
        .await;

        assert_eq!(outcome.final_status, Some(ReportStatus::PackagingFailed));
        assert_eq!(store.status_of(&r.uri), Some(ReportStatus::PackagingFailed));
    }

    #[tokio::test]
    async fn test_apply_when_failure_status_cannot_be_written() {
        let store = InMemoryStore::new();
        let r = report(1);
        store.insert_report(r.clone(), vec![]);
        store.claim_report(&r.uri).await.unwrap();
        store.fail_on(StoreOperation::SetStatusFrom);

        let outcome = apply_outcome(
            &store,
            &r,
            PackagingOutcome::Failed(FailureReason::ArchiveWrite {
                detail: "disk full".to_string(),
            }),
        )
        .await;

        assert_eq!(outcome.final_status, Some(ReportStatus::Processing));
        assert_eq!(store.status_of(&r.uri), Some(ReportStatus::Processing));
    }

    #[tokio::test]
    async fn test_apply_failed_keeps_status_set_by_another_run() {
        let store = InMemoryStore::new();
        let r = report(1);
        store.insert_report(r.clone(), vec![]);
        store.claim_report(&r.uri).await.unwrap();
        let p = package();
        assert!(apply_outcome(&store, &r, PackagingOutcome::Packaged(p.clone()))
            .await
            .is_packaged());
        store.clear_journal();

        let outcome = apply_outcome(
            &store,
            &r,
            PackagingOutcome::Failed(FailureReason::FileCountMismatch {
                expected: 2,
                actual: 1,
            }),
        )
        .await;

        assert_eq!(outcome.final_status, None);
        assert_eq!(store.status_of(&r.uri), Some(ReportStatus::Packaged));
        assert_eq!(store.package_for(&r.uri), Some(p));
        assert!(store.journal().is_empty());
    }

    #[tokio::test]
    async fn test_apply_packaged_on_released_report_is_not_marked() {
        let store = InMemoryStore::new();
        let r = report(1);
        store.insert_report(r.clone(), vec![]);
        store.claim_report(&r.uri).await.unwrap();
        store.clear_status(ReportStatus::Processing).await.unwrap();

        let outcome = apply_outcome(&store, &r, PackagingOutcome::Packaged(package())).await;

        assert!(!outcome.is_packaged());
        assert_eq!(outcome.final_status, None);
        assert_eq!(store.status_of(&r.uri), None);
    }

    #[tokio::test]
    async fn test_trigger_nothing_to_do() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryStore::new());

        let outcome = pipeline(store, dir.path()).trigger().await.unwrap();
        assert!(matches!(outcome, TriggerOutcome::NothingToDo));
    }

    #[tokio::test]
    async fn test_trigger_guard_propagates_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryStore::new());
        store.fail_on(StoreOperation::AnyReportInStatus);

        assert!(pipeline(store, dir.path()).trigger().await.is_err());
    }

    #[tokio::test]
    async fn test_claim_error_is_counted_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryStore::new());
        let r = report(1);
        store.insert_report(r.clone(), vec![]);
        store.fail_on(StoreOperation::ClaimReport);

        let TriggerOutcome::Accepted(handle) = pipeline(store.clone(), dir.path())
            .trigger()
            .await
            .unwrap()
        else {
            panic!("expected a run to start");
        };
        let summary = handle.wait().await.unwrap();

        assert_eq!(summary.claimed, 0);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.outcomes[0].final_status, None);
        assert_eq!(store.status_of(&r.uri), None);
    }

    #[tokio::test]
    async fn test_file_fetch_error_marks_failed() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryStore::new());
        let r = report(1);
        store.insert_report(r.clone(), vec![ReportFile::new("share://a", "a", "x", 1)]);
        store.fail_on(StoreOperation::FindFiles);

        let TriggerOutcome::Accepted(handle) = pipeline(store.clone(), dir.path())
            .trigger()
            .await
            .unwrap()
        else {
            panic!("expected a run to start");
        };
        let summary = handle.wait().await.unwrap();

        assert_eq!(summary.failed, 1);
        assert!(matches!(
            summary.outcomes[0].failure,
            Some(FailureReason::StoreUnavailable { .. })
        ));
        assert_eq!(store.status_of(&r.uri), Some(ReportStatus::PackagingFailed));
    }
}
