//! Zip archive builder
//!
//! Archives are written to `<target>.zip.part` and renamed once complete, so a
//! `.zip` file in the output directory is always whole.

use super::storage::FileStorage;
use crate::config::PackagingConfig;
use crate::core::manifest::StagedManifest;
use crate::domain::{ArchiveError, PackageId, ReportFile, ReportId};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Entry name of the manifest inside every archive
pub const MANIFEST_ENTRY_NAME: &str = "borderel.xml";

/// Default deflate level
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 9;

/// A finalized archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveRef {
    /// `share://` location of the archive
    pub location: String,

    /// Local path of the archive
    pub path: PathBuf,

    /// Archive size in bytes
    pub size_bytes: u64,

    /// SHA-256 of the archive, hex encoded
    pub checksum: String,
}

/// Name (without extension) of the archive for a report and package
pub fn archive_target(report_id: &ReportId, package_id: &PackageId) -> String {
    format!("{report_id}-{package_id}")
}

/// Builds zip archives from report files and a staged manifest
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    storage: FileStorage,
    compression_level: i32,
}

impl ArchiveBuilder {
    /// Create a new builder writing into the storage root
    pub fn new(storage: FileStorage, compression_level: i32) -> Self {
        Self {
            storage,
            compression_level: compression_level.clamp(1, 9),
        }
    }

    /// Create a builder from the packaging configuration
    pub fn from_config(config: &PackagingConfig) -> Self {
        Self::new(
            FileStorage::new(&config.file_path),
            config.compression_level,
        )
    }

    /// Build `<root>/<target>.zip` holding every file under its declared name
    /// plus the manifest as `borderel.xml`
    ///
    /// All sources are opened before the destination is created.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::SourceUnavailable`] if a file cannot be resolved or read
    /// - [`ArchiveError::Write`] if the archive cannot be written; the partial
    ///   file is removed
    pub async fn build(
        &self,
        target: &str,
        files: &[ReportFile],
        manifest: &StagedManifest,
    ) -> Result<ArchiveRef, ArchiveError> {
        let mut sources = Vec::with_capacity(files.len());
        for file in files {
            let path = self
                .storage
                .resolve(&file.location)
                .map_err(|e| source_unavailable(file, e))?;
            sources.push((file.clone(), path));
        }

        let final_path = self.storage.root().join(format!("{target}.zip"));
        let part_path = self.storage.root().join(format!("{target}.zip.part"));
        let location = self.storage.to_location(&final_path)?;
        let manifest_path = manifest.path().to_path_buf();
        let level = self.compression_level;

        let (size_bytes, checksum) = tokio::task::spawn_blocking(move || {
            write_archive(&sources, &manifest_path, &part_path, &final_path, level)
        })
        .await
        .map_err(|e| ArchiveError::write(target, format!("archive task failed: {e}")))??;

        tracing::info!(
            location = %location,
            size_bytes,
            file_count = files.len(),
            "Archive created"
        );

        Ok(ArchiveRef {
            path: self.storage.resolve(&location)?,
            location,
            size_bytes,
            checksum,
        })
    }
}

fn source_unavailable(file: &ReportFile, reason: impl ToString) -> ArchiveError {
    ArchiveError::SourceUnavailable {
        name: file.name.clone(),
        location: file.location.clone(),
        reason: reason.to_string(),
    }
}

fn write_archive(
    sources: &[(ReportFile, PathBuf)],
    manifest_path: &Path,
    part_path: &Path,
    final_path: &Path,
    level: i32,
) -> Result<(u64, String), ArchiveError> {
    let mut opened = Vec::with_capacity(sources.len());
    for (file, path) in sources {
        let handle = File::open(path).map_err(|e| source_unavailable(file, e))?;
        opened.push((file.name.as_str(), handle));
    }
    let manifest = File::open(manifest_path)
        .map_err(|e| ArchiveError::write(part_path.display().to_string(), format!("manifest: {e}")))?;

    let written = write_entries(opened, manifest, part_path, level)
        .and_then(|()| std::fs::rename(part_path, final_path))
        .map_err(|e| ArchiveError::write(part_path.display().to_string(), e));
    if let Err(e) = written {
        if let Err(cleanup) = std::fs::remove_file(part_path) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %part_path.display(), error = %cleanup, "Failed to remove partial archive");
            }
        }
        return Err(e);
    }

    let mut hasher = Sha256::new();
    let mut archive = File::open(final_path)
        .map_err(|e| ArchiveError::write(final_path.display().to_string(), e))?;
    let size_bytes = io::copy(&mut archive, &mut hasher)
        .map_err(|e| ArchiveError::write(final_path.display().to_string(), e))?;

    Ok((size_bytes, format!("{:x}", hasher.finalize())))
}

fn write_entries(
    sources: Vec<(&str, File)>,
    manifest: File,
    part_path: &Path,
    level: i32,
) -> io::Result<()> {
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(level));

    let mut zip = ZipWriter::new(File::create(part_path)?);
    for (name, source) in sources {
        zip.start_file(name, options).map_err(io::Error::other)?;
        io::copy(&mut BufReader::new(source), &mut zip)?;
    }
    zip.start_file(MANIFEST_ENTRY_NAME, options)
        .map_err(io::Error::other)?;
    io::copy(&mut BufReader::new(manifest), &mut zip)?;

    let mut output = zip.finish().map_err(io::Error::other)?;
    output.flush()?;
    output.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::ManifestBuilder;
    use crate::domain::{Report, ReportBuilder};
    use chrono::Utc;
    use std::io::Read;
    use tempfile::TempDir;

    fn report() -> Report {
        ReportBuilder::new()
            .uri("http://data.lblod.info/bbcdr-reports/1")
            .unwrap()
            .id("r-1")
            .unwrap()
            .modified(Utc::now())
            .build()
            .unwrap()
    }

    fn seed(dir: &TempDir, name: &str, content: &str) -> ReportFile {
        std::fs::write(dir.path().join(format!("{name}.bin")), content).unwrap();
        ReportFile::new(format!("share://{name}.bin"), name, "text/plain", content.len() as u64)
    }

    async fn staged(dir: &TempDir, files: &[ReportFile]) -> StagedManifest {
        ManifestBuilder::default()
            .build(&report(), files)
            .stage(dir.path())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_build_archive_contents() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![seed(&dir, "a.xlsx", "alpha"), seed(&dir, "b.pdf", "beta")];
        let manifest = staged(&dir, &files).await;
        let builder = ArchiveBuilder::new(FileStorage::new(dir.path()), 9);

        let archive = builder.build("r-1-pkg", &files, &manifest).await.unwrap();

        assert_eq!(archive.location, "share://r-1-pkg.zip");
        assert_eq!(archive.path, dir.path().join("r-1-pkg.zip"));
        assert_eq!(archive.checksum.len(), 64);
        assert_eq!(
            archive.size_bytes,
            std::fs::metadata(&archive.path).unwrap().len()
        );
        assert!(!dir.path().join("r-1-pkg.zip.part").exists());

        let mut zip = zip::ZipArchive::new(File::open(&archive.path).unwrap()).unwrap();
        assert_eq!(zip.len(), 3);
        let mut content = String::new();
        zip.by_name("a.xlsx")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "alpha");
        let mut borderel = String::new();
        zip.by_name(MANIFEST_ENTRY_NAME)
            .unwrap()
            .read_to_string(&mut borderel)
            .unwrap();
        assert!(borderel.contains("b.pdf"));
    }

    #[tokio::test]
    async fn test_missing_source_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = vec![seed(&dir, "a.xlsx", "alpha")];
        files.push(ReportFile::new("share://gone.pdf", "gone.pdf", "application/pdf", 0));
        let manifest = staged(&dir, &files).await;
        let builder = ArchiveBuilder::new(FileStorage::new(dir.path()), 9);

        let err = builder.build("r-1-pkg", &files, &manifest).await.unwrap_err();

        assert!(
            matches!(err, ArchiveError::SourceUnavailable { ref name, .. } if name == "gone.pdf")
        );
        assert!(!dir.path().join("r-1-pkg.zip").exists());
        assert!(!dir.path().join("r-1-pkg.zip.part").exists());
    }

    #[tokio::test]
    async fn test_invalid_location_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![ReportFile::new("ftp://host/a.pdf", "a.pdf", "application/pdf", 0)];
        let manifest = staged(&dir, &files).await;
        let builder = ArchiveBuilder::new(FileStorage::new(dir.path()), 9);

        let err = builder.build("r-1-pkg", &files, &manifest).await.unwrap_err();
        assert!(matches!(err, ArchiveError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_unwritable_destination_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![seed(&dir, "a.xlsx", "alpha")];
        let manifest = staged(&dir, &files).await;
        let builder = ArchiveBuilder::new(FileStorage::new(dir.path()), 9);

        let err = builder
            .build("missing-dir/r-1-pkg", &files, &manifest)
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Write { .. }));
    }

    #[test]
    fn test_archive_target_naming() {
        let id = ReportId::new("r-1").unwrap();
        let package = PackageId::generate();
        assert_eq!(archive_target(&id, &package), format!("r-1-{package}"));
    }

    #[test]
    fn test_compression_level_clamped() {
        let builder = ArchiveBuilder::new(FileStorage::new("/data"), 42);
        assert_eq!(builder.compression_level, 9);
    }
}
