//! Metadata store abstraction
//!
//! This module defines the trait that metadata store adapters must implement
//! to back the packaging pipeline.

use crate::domain::{Package, Report, ReportFile, ReportStatus, ReportUri, StoreError};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Number of reports per packaging state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Sent reports without any packaging status
    pub eligible: u64,

    /// Reports with an attempt in flight (or left over by a crash)
    pub processing: u64,

    /// Reports packaged successfully
    pub packaged: u64,

    /// Reports whose packaging failed
    pub packaging_failed: u64,
}

impl StatusCounts {
    /// Count for a single status
    pub fn get(&self, status: ReportStatus) -> u64 {
        match status {
            ReportStatus::Processing => self.processing,
            ReportStatus::Packaged => self.packaged,
            ReportStatus::PackagingFailed => self.packaging_failed,
        }
    }
}

/// Identifies a [`MetadataStore`] operation, used for diagnostics and by the
/// in-memory store's failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    FindEligibleReports,
    FindFiles,
    SetStatus,
    SetStatusFrom,
    ClaimReport,
    RegisterPackage,
    AnyReportInStatus,
    ClearStatus,
    StatusCounts,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FindEligibleReports => "find_eligible_reports",
            Self::FindFiles => "find_files",
            Self::SetStatus => "set_status",
            Self::SetStatusFrom => "set_status_from",
            Self::ClaimReport => "claim_report",
            Self::RegisterPackage => "register_package",
            Self::AnyReportInStatus => "any_report_in_status",
            Self::ClearStatus => "clear_status",
            Self::StatusCounts => "status_counts",
        };
        write!(f, "{name}")
    }
}

/// Metadata store trait
///
/// Reads and writes report, file, status and package records. Every status
/// write also refreshes the report's `modified` timestamp.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Test the store connection
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    async fn test_connection(&self) -> StoreResult<()>;

    /// Ensure the schema used by the packager exists
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    async fn ensure_schema(&self) -> StoreResult<()>;

    /// Reports marked as sent that carry no packaging status, oldest
    /// `modified` first
    async fn find_eligible_reports(&self) -> StoreResult<Vec<Report>>;

    /// Files attached to a report, in their stored order
    async fn find_files(&self, report: &ReportUri) -> StoreResult<Vec<ReportFile>>;

    /// Overwrite the packaging status of a report
    async fn set_status(&self, report: &ReportUri, status: ReportStatus) -> StoreResult<()>;

    /// Move a report from `from` to `to`, only if it is currently in `from`
    ///
    /// Returns `false` and leaves the report untouched when its status is
    /// anything else.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the report does not exist.
    async fn set_status_from(
        &self,
        report: &ReportUri,
        from: ReportStatus,
        to: ReportStatus,
    ) -> StoreResult<bool>;

    /// Atomically move a report without status to `Processing`
    ///
    /// Returns `false` when the report already carries a status, meaning
    /// another run claimed it first.
    async fn claim_report(&self, report: &ReportUri) -> StoreResult<bool>;

    /// Record the package produced for a report
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the report already has a package.
    async fn register_package(&self, report: &ReportUri, package: &Package) -> StoreResult<()>;

    /// Whether at least one report is in the given status
    async fn any_report_in_status(&self, status: ReportStatus) -> StoreResult<bool>;

    /// Remove the given status from every report carrying it
    ///
    /// Idempotent. Returns the number of reports cleared.
    async fn clear_status(&self, status: ReportStatus) -> StoreResult<u64>;

    /// Number of reports per packaging state
    async fn status_counts(&self) -> StoreResult<StatusCounts>;
}
