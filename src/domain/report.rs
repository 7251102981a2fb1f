//! Report domain model
//!
//! This module defines the Report type, its packaging status and the files
//! attached to it.

use super::ids::{ReportId, ReportUri};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream document status marking a report as sent, and therefore a
/// candidate for packaging.
pub const SENT_DOCUMENT_STATUS: &str = "http://data.lblod.info/document-statuses/verstuurd";

const STATUS_PROCESSING_URI: &str = "http://mu.semte.ch/vocabularies/ext/bbcdr-status/PACKAGING";
const STATUS_PACKAGED_URI: &str = "http://mu.semte.ch/vocabularies/ext/bbcdr-status/PACKAGED";
const STATUS_PACKAGING_FAILED_URI: &str =
    "http://mu.semte.ch/vocabularies/ext/bbcdr-status/PACKAGING_FAILED";

/// Packaging status of a report
///
/// A report without any status is untouched and eligible. `Packaged` and
/// `PackagingFailed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// A packaging attempt is in flight
    Processing,
    /// The report was packaged and the package registered
    Packaged,
    /// The packaging attempt failed
    PackagingFailed,
}

impl ReportStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Processing,
        ReportStatus::Packaged,
        ReportStatus::PackagingFailed,
    ];

    /// The URI under which this status is persisted
    pub fn as_uri(&self) -> &'static str {
        match self {
            Self::Processing => STATUS_PROCESSING_URI,
            Self::Packaged => STATUS_PACKAGED_URI,
            Self::PackagingFailed => STATUS_PACKAGING_FAILED_URI,
        }
    }

    /// Parses a persisted status URI
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_uri() == uri)
    }

    /// Whether a report in this status will never be picked up again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Packaged | Self::PackagingFailed)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Processing => "processing",
            Self::Packaged => "packaged",
            Self::PackagingFailed => "packaging_failed",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "processing" => Ok(Self::Processing),
            "packaged" => Ok(Self::Packaged),
            "packaging_failed" | "failed" => Ok(Self::PackagingFailed),
            _ => Self::from_uri(s).ok_or_else(|| {
                format!(
                    "Invalid report status '{s}'. Must be one of: processing, packaged, packaging_failed"
                )
            }),
        }
    }
}

/// A report awaiting (or having gone through) packaging
///
/// # Examples
///
/// ```
/// use packager::domain::report::ReportBuilder;
/// use chrono::Utc;
///
/// let report = ReportBuilder::new()
///     .uri("http://data.lblod.info/bbcdr-reports/1")
///     .unwrap()
///     .id("5c2f1a7e")
///     .unwrap()
///     .modified(Utc::now())
///     .build()
///     .unwrap();
/// assert!(report.status.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Store identity of the report
    pub uri: ReportUri,

    /// Short identifier used in generated file names
    pub id: ReportId,

    /// Last time the report (or its status) was modified
    pub modified: DateTime<Utc>,

    /// Packaging status, `None` when the report was never picked up
    pub status: Option<ReportStatus>,
}

impl Report {
    /// Creates a new builder for constructing a Report
    pub fn builder() -> ReportBuilder {
        ReportBuilder::default()
    }
}

/// Builder for constructing Report instances
#[derive(Debug, Default)]
pub struct ReportBuilder {
    uri: Option<ReportUri>,
    id: Option<ReportId>,
    modified: Option<DateTime<Utc>>,
    status: Option<ReportStatus>,
}

impl ReportBuilder {
    /// Creates a new ReportBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the report URI
    pub fn uri(mut self, uri: impl Into<String>) -> Result<Self, String> {
        self.uri = Some(ReportUri::new(uri)?);
        Ok(self)
    }

    /// Sets the report id
    pub fn id(mut self, id: impl Into<String>) -> Result<Self, String> {
        self.id = Some(ReportId::new(id)?);
        Ok(self)
    }

    /// Sets the modification timestamp
    pub fn modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Sets the packaging status
    pub fn status(mut self, status: ReportStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Builds the Report
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing
    pub fn build(self) -> Result<Report, String> {
        Ok(Report {
            uri: self.uri.ok_or("uri is required")?,
            id: self.id.ok_or("id is required")?,
            modified: self.modified.ok_or("modified is required")?,
            status: self.status,
        })
    }
}

/// A file attached to a report
///
/// Read-only from the packager's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFile {
    /// Content location, a `share://` URL
    pub location: String,

    /// Declared file name, used as the entry name inside the archive
    pub name: String,

    /// Declared format (MIME type)
    pub format: String,

    /// Declared size in bytes
    pub size: u64,
}

impl ReportFile {
    /// Creates a new ReportFile
    pub fn new(
        location: impl Into<String>,
        name: impl Into<String>,
        format: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            location: location.into(),
            name: name.into(),
            format: format.into(),
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_uri_roundtrip() {
        for status in ReportStatus::ALL {
            assert_eq!(ReportStatus::from_uri(status.as_uri()), Some(status));
        }
    }

    #[test]
    fn test_status_from_unknown_uri() {
        assert_eq!(
            ReportStatus::from_uri("http://mu.semte.ch/vocabularies/ext/bbcdr-status/UNKNOWN"),
            None
        );
    }

    #[test]
    fn test_processing_uri_matches_legacy_value() {
        assert!(ReportStatus::Processing.as_uri().ends_with("/PACKAGING"));
    }

    #[test]
    fn test_status_terminal() {
        assert!(!ReportStatus::Processing.is_terminal());
        assert!(ReportStatus::Packaged.is_terminal());
        assert!(ReportStatus::PackagingFailed.is_terminal());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            "processing".parse::<ReportStatus>().unwrap(),
            ReportStatus::Processing
        );
        assert_eq!(
            "FAILED".parse::<ReportStatus>().unwrap(),
            ReportStatus::PackagingFailed
        );
        assert_eq!(
            STATUS_PACKAGED_URI.parse::<ReportStatus>().unwrap(),
            ReportStatus::Packaged
        );
        assert!("bogus".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn test_report_builder_missing_fields() {
        let result = ReportBuilder::new()
            .uri("http://data.lblod.info/bbcdr-reports/1")
            .unwrap()
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_report_builder_with_status() {
        let report = Report::builder()
            .uri("http://data.lblod.info/bbcdr-reports/1")
            .unwrap()
            .id("r1")
            .unwrap()
            .modified(Utc::now())
            .status(ReportStatus::Packaged)
            .build()
            .unwrap();
        assert_eq!(report.status, Some(ReportStatus::Packaged));
    }
}
