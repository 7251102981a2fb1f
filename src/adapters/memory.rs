//! In-memory metadata store
//!
//! A [`MetadataStore`] kept entirely in process memory. Used by tests and for
//! local dry runs. Supports failure injection per operation (optionally scoped
//! to a single report) and records every mutation in a journal so callers can
//! assert on the order of status writes.

use crate::adapters::store::{MetadataStore, StatusCounts, StoreOperation, StoreResult};
use crate::domain::{
    Package, Report, ReportFile, ReportStatus, ReportUri, StoreError, SENT_DOCUMENT_STATUS,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// A mutation applied to the in-memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMutation {
    /// A report was claimed (no status -> Processing)
    Claimed(ReportUri),
    /// A status was written
    StatusSet(ReportUri, ReportStatus),
    /// A status was removed by reconciliation
    StatusCleared(ReportUri),
    /// A package was registered against a report
    PackageRegistered(ReportUri, Package),
}

impl StoreMutation {
    /// The report the mutation applies to
    pub fn report(&self) -> &ReportUri {
        match self {
            Self::Claimed(uri)
            | Self::StatusSet(uri, _)
            | Self::StatusCleared(uri)
            | Self::PackageRegistered(uri, _) => uri,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredReport {
    report: Report,
    document_status: String,
    files: Vec<ReportFile>,
    package: Option<Package>,
}

#[derive(Debug, Default)]
struct StoreState {
    reports: BTreeMap<ReportUri, StoredReport>,
    journal: Vec<StoreMutation>,
    failures: HashSet<(StoreOperation, Option<ReportUri>)>,
}

impl StoreState {
    fn check_failure(&self, op: StoreOperation, report: Option<&ReportUri>) -> StoreResult<()> {
        let scoped = report.is_some_and(|uri| self.failures.contains(&(op, Some(uri.clone()))));
        if scoped || self.failures.contains(&(op, None)) {
            return Err(StoreError::Unavailable(format!("injected failure in {op}")));
        }
        Ok(())
    }

    fn stored_mut(&mut self, report: &ReportUri) -> StoreResult<&mut StoredReport> {
        self.reports
            .get_mut(report)
            .ok_or_else(|| StoreError::NotFound(report.to_string()))
    }
}

/// In-memory implementation of [`MetadataStore`]
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("store lock poisoned: {e}")))
    }

    /// Seed a sent report with its files
    pub fn insert_report(&self, report: Report, files: Vec<ReportFile>) {
        self.insert_report_with_document_status(report, SENT_DOCUMENT_STATUS, files);
    }

    /// Seed a report with an arbitrary upstream document status
    pub fn insert_report_with_document_status(
        &self,
        report: Report,
        document_status: &str,
        files: Vec<ReportFile>,
    ) {
        if let Ok(mut state) = self.lock() {
            state.reports.insert(
                report.uri.clone(),
                StoredReport {
                    report,
                    document_status: document_status.to_string(),
                    files,
                    package: None,
                },
            );
        }
    }

    /// Make every call of `op` fail with [`StoreError::Unavailable`]
    pub fn fail_on(&self, op: StoreOperation) {
        if let Ok(mut state) = self.lock() {
            state.failures.insert((op, None));
        }
    }

    /// Make calls of `op` concerning `report` fail
    pub fn fail_on_report(&self, op: StoreOperation, report: &ReportUri) {
        if let Ok(mut state) = self.lock() {
            state.failures.insert((op, Some(report.clone())));
        }
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        if let Ok(mut state) = self.lock() {
            state.failures.clear();
        }
    }

    /// Current state of a report
    pub fn report(&self, uri: &ReportUri) -> Option<Report> {
        self.lock()
            .ok()
            .and_then(|state| state.reports.get(uri).map(|stored| stored.report.clone()))
    }

    /// Current packaging status of a report
    pub fn status_of(&self, uri: &ReportUri) -> Option<ReportStatus> {
        self.report(uri).and_then(|report| report.status)
    }

    /// Package registered against a report
    pub fn package_for(&self, uri: &ReportUri) -> Option<Package> {
        self.lock()
            .ok()
            .and_then(|state| state.reports.get(uri).and_then(|s| s.package.clone()))
    }

    /// All registered packages with the report they belong to
    pub fn packages(&self) -> Vec<(ReportUri, Package)> {
        self.lock()
            .map(|state| {
                state
                    .reports
                    .iter()
                    .filter_map(|(uri, s)| s.package.clone().map(|p| (uri.clone(), p)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Mutations applied so far, in order
    pub fn journal(&self) -> Vec<StoreMutation> {
        self.lock()
            .map(|state| state.journal.clone())
            .unwrap_or_default()
    }

    /// Forget recorded mutations
    pub fn clear_journal(&self) {
        if let Ok(mut state) = self.lock() {
            state.journal.clear();
        }
    }
}

#[async_trait]
impl MetadataStore for InMemoryStore {
    async fn test_connection(&self) -> StoreResult<()> {
        self.lock().map(|_| ())
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_eligible_reports(&self) -> StoreResult<Vec<Report>> {
        let state = self.lock()?;
        state.check_failure(StoreOperation::FindEligibleReports, None)?;

        let mut reports: Vec<Report> = state
            .reports
            .values()
            .filter(|s| s.document_status == SENT_DOCUMENT_STATUS && s.report.status.is_none())
            .map(|s| s.report.clone())
            .collect();
        reports.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.uri.cmp(&b.uri)));
        Ok(reports)
    }

    async fn find_files(&self, report: &ReportUri) -> StoreResult<Vec<ReportFile>> {
        let state = self.lock()?;
        state.check_failure(StoreOperation::FindFiles, Some(report))?;
        Ok(state
            .reports
            .get(report)
            .map(|s| s.files.clone())
            .unwrap_or_default())
    }

    async fn set_status(&self, report: &ReportUri, status: ReportStatus) -> StoreResult<()> {
        let mut state = self.lock()?;
        state.check_failure(StoreOperation::SetStatus, Some(report))?;

        let stored = state.stored_mut(report)?;
        stored.report.status = Some(status);
        stored.report.modified = Utc::now();
        state
            .journal
            .push(StoreMutation::StatusSet(report.clone(), status));
        Ok(())
    }

    async fn set_status_from(
        &self,
        report: &ReportUri,
        from: ReportStatus,
        to: ReportStatus,
    ) -> StoreResult<bool> {
        let mut state = self.lock()?;
        state.check_failure(StoreOperation::SetStatusFrom, Some(report))?;

        let stored = state.stored_mut(report)?;
        if stored.report.status != Some(from) {
            return Ok(false);
        }
        stored.report.status = Some(to);
        stored.report.modified = Utc::now();
        state
            .journal
            .push(StoreMutation::StatusSet(report.clone(), to));
        Ok(true)
    }

    async fn claim_report(&self, report: &ReportUri) -> StoreResult<bool> {
        let mut state = self.lock()?;
        state.check_failure(StoreOperation::ClaimReport, Some(report))?;

        let stored = state.stored_mut(report)?;
        if stored.report.status.is_some() {
            return Ok(false);
        }
        stored.report.status = Some(ReportStatus::Processing);
        stored.report.modified = Utc::now();
        state.journal.push(StoreMutation::Claimed(report.clone()));
        Ok(true)
    }

    async fn register_package(&self, report: &ReportUri, package: &Package) -> StoreResult<()> {
        let mut state = self.lock()?;
        state.check_failure(StoreOperation::RegisterPackage, Some(report))?;

        let stored = state.stored_mut(report)?;
        if let Some(existing) = &stored.package {
            return Err(StoreError::Conflict(format!(
                "report {report} already has package {}",
                existing.id
            )));
        }
        stored.package = Some(package.clone());
        state
            .journal
            .push(StoreMutation::PackageRegistered(report.clone(), package.clone()));
        Ok(())
    }

    async fn any_report_in_status(&self, status: ReportStatus) -> StoreResult<bool> {
        let state = self.lock()?;
        state.check_failure(StoreOperation::AnyReportInStatus, None)?;
        Ok(state
            .reports
            .values()
            .any(|s| s.report.status == Some(status)))
    }

    async fn clear_status(&self, status: ReportStatus) -> StoreResult<u64> {
        let mut state = self.lock()?;
        state.check_failure(StoreOperation::ClearStatus, None)?;

        let now = Utc::now();
        let mut cleared = Vec::new();
        for (uri, stored) in state.reports.iter_mut() {
            if stored.report.status == Some(status) {
                stored.report.status = None;
                stored.report.modified = now;
                cleared.push(uri.clone());
            }
        }
        let count = cleared.len() as u64;
        state
            .journal
            .extend(cleared.into_iter().map(StoreMutation::StatusCleared));
        Ok(count)
    }

    async fn status_counts(&self) -> StoreResult<StatusCounts> {
        let state = self.lock()?;
        state.check_failure(StoreOperation::StatusCounts, None)?;

        let mut counts = StatusCounts::default();
        for stored in state.reports.values() {
            match stored.report.status {
                None if stored.document_status == SENT_DOCUMENT_STATUS => counts.eligible += 1,
                None => {}
                Some(ReportStatus::Processing) => counts.processing += 1,
                Some(ReportStatus::Packaged) => counts.packaged += 1,
                Some(ReportStatus::PackagingFailed) => counts.packaging_failed += 1,
            }
        }
        Ok(counts)
    }
}
