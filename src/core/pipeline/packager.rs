//! Store-free packaging of a single report
//!
//! [`ReportPackager`] turns a report and its files into a
//! [`PackagingOutcome`]. It never touches the metadata store; status writes
//! and package registration are applied by the pipeline.

use super::outcome::{FailureReason, PackagingOutcome};
use crate::config::PackagingConfig;
use crate::core::archive::{archive_target, ArchiveBuilder};
use crate::core::manifest::ManifestBuilder;
use crate::domain::{Package, PackageId, Report, ReportFile};
use chrono::Utc;
use std::path::PathBuf;

/// Check that a report has exactly the required number of files
pub fn check_file_count(files: &[ReportFile], expected: usize) -> Result<(), FailureReason> {
    if files.len() == expected {
        Ok(())
    } else {
        Err(FailureReason::FileCountMismatch {
            expected,
            actual: files.len(),
        })
    }
}

/// Builds the manifest and archive for one report
#[derive(Debug, Clone)]
pub struct ReportPackager {
    manifest_builder: ManifestBuilder,
    archive_builder: ArchiveBuilder,
    files_per_report: usize,
    staging_dir: PathBuf,
}

impl ReportPackager {
    /// Create a packager
    ///
    /// Manifests are staged in `staging_dir` while the archive is written.
    pub fn new(
        manifest_builder: ManifestBuilder,
        archive_builder: ArchiveBuilder,
        files_per_report: usize,
        staging_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            manifest_builder,
            archive_builder,
            files_per_report,
            staging_dir: staging_dir.into(),
        }
    }

    /// Create a packager from the packaging configuration, staging manifests
    /// next to the archives
    pub fn from_config(config: &PackagingConfig) -> Self {
        Self::new(
            ManifestBuilder::new(config.manifest.clone()),
            ArchiveBuilder::from_config(config),
            config.files_per_report,
            &config.file_path,
        )
    }

    /// Package a report
    pub async fn package(&self, report: &Report, files: &[ReportFile]) -> PackagingOutcome {
        match self.try_package(report, files).await {
            Ok(package) => PackagingOutcome::Packaged(package),
            Err(reason) => PackagingOutcome::Failed(reason),
        }
    }

    async fn try_package(
        &self,
        report: &Report,
        files: &[ReportFile],
    ) -> Result<Package, FailureReason> {
        check_file_count(files, self.files_per_report)?;

        let manifest = self.manifest_builder.build(report, files);
        let staged = manifest.stage(&self.staging_dir).await?;

        let package_id = PackageId::generate();
        let target = archive_target(&report.id, &package_id);
        let archive = self.archive_builder.build(&target, files, &staged).await?;
        drop(staged);

        Ok(Package {
            id: package_id,
            location: archive.location,
            size_bytes: archive.size_bytes,
            checksum: archive.checksum,
            created_at: Utc::now(),
        })
    }
}
