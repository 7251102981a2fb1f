//! On-disk staging of a rendered manifest

use super::document::Manifest;
use crate::domain::ManifestError;
use std::path::{Path, PathBuf};

/// A manifest written to disk for the duration of one archive build
///
/// The file is removed when the value is dropped.
#[derive(Debug)]
pub struct StagedManifest {
    path: PathBuf,
}

impl StagedManifest {
    /// Location of the staged file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedManifest {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove staged manifest"
                );
            }
        }
    }
}

impl Manifest {
    /// Render and write the manifest to `<dir>/<report id>-borderel.xml`
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Build`] if rendering fails and
    /// [`ManifestError::Staging`] if the file cannot be written.
    pub async fn stage(&self, dir: impl AsRef<Path>) -> Result<StagedManifest, ManifestError> {
        let xml = self.to_xml()?;
        let path = dir.as_ref().join(self.staging_file_name());

        tokio::fs::write(&path, xml)
            .await
            .map_err(|e| ManifestError::Staging {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(report_id = %self.report_id, path = %path.display(), "Manifest staged");
        Ok(StagedManifest { path })
    }
}
