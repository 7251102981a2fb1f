//! PostgreSQL adapter implementing the metadata store trait

use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{eligible_reports, FileRow, PackageRow, ReportRow};
use crate::adapters::store::{MetadataStore, StatusCounts, StoreResult};
use crate::domain::{
    Package, Report, ReportFile, ReportStatus, ReportUri, StoreError, SENT_DOCUMENT_STATUS,
};
use async_trait::async_trait;
use std::sync::Arc;

/// PostgreSQL implementation of [`MetadataStore`]
///
/// Status values are persisted as their URIs.
pub struct PostgreSQLStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLStore {
    /// Create a new PostgreSQL store
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl MetadataStore for PostgreSQLStore {
    async fn test_connection(&self) -> StoreResult<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        self.client.ensure_schema().await
    }

    async fn find_eligible_reports(&self) -> StoreResult<Vec<Report>> {
        let query = r#"
            SELECT uri, id, modified, packaging_status
            FROM reports
            WHERE document_status = $1 AND packaging_status IS NULL
            ORDER BY modified ASC, uri ASC
        "#;

        let rows = self.client.query(query, &[&SENT_DOCUMENT_STATUS]).await?;
        Ok(eligible_reports(rows.iter().map(ReportRow::from_row)))
    }

    async fn find_files(&self, report: &ReportUri) -> StoreResult<Vec<ReportFile>> {
        let query = r#"
            SELECT location, name, format, size
            FROM report_files
            WHERE report_uri = $1
            ORDER BY position ASC, id ASC
        "#;

        let rows = self.client.query(query, &[&report.as_str()]).await?;
        rows.iter()
            .map(|row| FileRow::from_row(row)?.to_domain())
            .collect()
    }

    async fn set_status(&self, report: &ReportUri, status: ReportStatus) -> StoreResult<()> {
        let statement = r#"
            UPDATE reports
            SET packaging_status = $2, modified = NOW()
            WHERE uri = $1
        "#;

        let updated = self
            .client
            .execute(statement, &[&report.as_str(), &status.as_uri()])
            .await?;
        if updated == 0 {
            return Err(StoreError::NotFound(report.to_string()));
        }

        tracing::debug!(report = %report, status = %status, "Status written");
        Ok(())
    }

    async fn set_status_from(
        &self,
        report: &ReportUri,
        from: ReportStatus,
        to: ReportStatus,
    ) -> StoreResult<bool> {
        let statement = r#"
            UPDATE reports
            SET packaging_status = $3, modified = NOW()
            WHERE uri = $1 AND packaging_status = $2
        "#;

        let updated = self
            .client
            .execute(statement, &[&report.as_str(), &from.as_uri(), &to.as_uri()])
            .await?;
        if updated == 1 {
            tracing::debug!(report = %report, from = %from, to = %to, "Status moved");
            return Ok(true);
        }

        let exists = self
            .client
            .query("SELECT 1 FROM reports WHERE uri = $1", &[&report.as_str()])
            .await?;
        if exists.is_empty() {
            return Err(StoreError::NotFound(report.to_string()));
        }
        Ok(false)
    }

    async fn claim_report(&self, report: &ReportUri) -> StoreResult<bool> {
        let statement = r#"
            UPDATE reports
            SET packaging_status = $2, modified = NOW()
            WHERE uri = $1 AND packaging_status IS NULL
        "#;

        let updated = self
            .client
            .execute(
                statement,
                &[&report.as_str(), &ReportStatus::Processing.as_uri()],
            )
            .await?;
        Ok(updated == 1)
    }

    async fn register_package(&self, report: &ReportUri, package: &Package) -> StoreResult<()> {
        let row = PackageRow::from_domain(package)?;
        let statement = r#"
            INSERT INTO packages (id, report_uri, location, size_bytes, checksum, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (report_uri) DO NOTHING
        "#;

        let inserted = self
            .client
            .execute(
                statement,
                &[
                    &row.id,
                    &report.as_str(),
                    &row.location,
                    &row.size_bytes,
                    &row.checksum,
                    &row.created_at,
                ],
            )
            .await?;
        if inserted == 0 {
            return Err(StoreError::Conflict(format!(
                "report {report} already has a package"
            )));
        }
        Ok(())
    }

    async fn any_report_in_status(&self, status: ReportStatus) -> StoreResult<bool> {
        let query = "SELECT EXISTS(SELECT 1 FROM reports WHERE packaging_status = $1)";

        let row = self.client.query_one(query, &[&status.as_uri()]).await?;
        row.try_get(0)
            .map_err(|e| StoreError::InvalidRecord(format!("EXISTS result: {e}")))
    }

    async fn clear_status(&self, status: ReportStatus) -> StoreResult<u64> {
        let statement = r#"
            UPDATE reports
            SET packaging_status = NULL, modified = NOW()
            WHERE packaging_status = $1
        "#;

        self.client.execute(statement, &[&status.as_uri()]).await
    }

    async fn status_counts(&self) -> StoreResult<StatusCounts> {
        let query = r#"
            SELECT packaging_status, COUNT(*) AS total
            FROM reports
            WHERE document_status = $1 OR packaging_status IS NOT NULL
            GROUP BY packaging_status
        "#;

        let rows = self.client.query(query, &[&SENT_DOCUMENT_STATUS]).await?;

        let mut counts = StatusCounts::default();
        for row in rows {
            let status: Option<String> = row
                .try_get("packaging_status")
                .map_err(|e| StoreError::InvalidRecord(format!("packaging_status: {e}")))?;
            let total: i64 = row
                .try_get("total")
                .map_err(|e| StoreError::InvalidRecord(format!("total: {e}")))?;
            let total = total.max(0) as u64;

            match status.as_deref().map(ReportStatus::from_uri) {
                None => counts.eligible = total,
                Some(Some(ReportStatus::Processing)) => counts.processing = total,
                Some(Some(ReportStatus::Packaged)) => counts.packaged = total,
                Some(Some(ReportStatus::PackagingFailed)) => counts.packaging_failed = total,
                Some(None) => {
                    tracing::warn!(status = ?status, total, "Ignoring unknown packaging status");
                }
            }
        }
        Ok(counts)
    }
}
