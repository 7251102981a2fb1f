//! PostgreSQL row models
//!
//! Mapping between table rows and domain types. Conversions never panic on
//! unexpected data; they surface [`StoreError::InvalidRecord`] instead.

use crate::adapters::store::StoreResult;
use crate::domain::{
    Package, Report, ReportFile, ReportId, ReportStatus, ReportUri, StoreError,
};
use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use uuid::Uuid;

/// Row of the `reports` table
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub uri: String,
    pub id: String,
    pub modified: DateTime<Utc>,
    pub packaging_status: Option<String>,
}

impl ReportRow {
    /// Read a report row selected as `uri, id, modified, packaging_status`
    pub fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            uri: column(row, "uri")?,
            id: column(row, "id")?,
            modified: column(row, "modified")?,
            packaging_status: column(row, "packaging_status")?,
        })
    }

    /// Convert to domain Report
    pub fn to_domain(&self) -> StoreResult<Report> {
        let uri = ReportUri::new(&self.uri).map_err(StoreError::InvalidRecord)?;
        let id = ReportId::new(&self.id)
            .map_err(|e| StoreError::InvalidRecord(format!("report {}: {e}", self.uri)))?;
        let status = self
            .packaging_status
            .as_deref()
            .map(|value| parse_status(&self.uri, value))
            .transpose()?;

        Ok(Report {
            uri,
            id,
            modified: self.modified,
            status,
        })
    }
}

/// Convert eligible report rows, skipping the ones that cannot be read
///
/// A rejected row is logged and left untouched in the store, so it never
/// blocks the reports behind it.
pub fn eligible_reports<I>(rows: I) -> Vec<Report>
where
    I: IntoIterator<Item = StoreResult<ReportRow>>,
{
    rows.into_iter()
        .filter_map(|row| match row.and_then(|row| row.to_domain()) {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable eligible report");
                None
            }
        })
        .collect()
}

/// Row of the `report_files` table
#[derive(Debug, Clone)]
pub struct FileRow {
    pub location: String,
    pub name: String,
    pub format: String,
    pub size: i64,
}

impl FileRow {
    /// Read a file row selected as `location, name, format, size`
    pub fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            location: column(row, "location")?,
            name: column(row, "name")?,
            format: column(row, "format")?,
            size: column(row, "size")?,
        })
    }

    /// Convert to domain ReportFile
    pub fn to_domain(&self) -> StoreResult<ReportFile> {
        let size = u64::try_from(self.size).map_err(|_| {
            StoreError::InvalidRecord(format!("file {} has negative size", self.location))
        })?;
        Ok(ReportFile::new(
            self.location.clone(),
            self.name.clone(),
            self.format.clone(),
            size,
        ))
    }
}

/// Row of the `packages` table
#[derive(Debug, Clone)]
pub struct PackageRow {
    pub id: Uuid,
    pub location: String,
    pub size_bytes: i64,
    pub checksum: String,
    pub created_at: DateTime<Utc>,
}

impl PackageRow {
    /// Convert from domain Package
    pub fn from_domain(package: &Package) -> StoreResult<Self> {
        let size_bytes = i64::try_from(package.size_bytes).map_err(|_| {
            StoreError::InvalidRecord(format!(
                "package {} size {} exceeds BIGINT",
                package.id, package.size_bytes
            ))
        })?;
        Ok(Self {
            id: *package.id.as_uuid(),
            location: package.location.clone(),
            size_bytes,
            checksum: package.checksum.clone(),
            created_at: package.created_at,
        })
    }
}

fn column<'a, T>(row: &'a Row, name: &str) -> StoreResult<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(name)
        .map_err(|e| StoreError::InvalidRecord(format!("column {name}: {e}")))
}

fn parse_status(uri: &str, value: &str) -> StoreResult<ReportStatus> {
    ReportStatus::from_uri(value).ok_or_else(|| {
        StoreError::InvalidRecord(format!("report {uri} has unknown packaging status {value}"))
    })
}
