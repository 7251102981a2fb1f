//! Manifest builder

use super::document::{Manifest, ManifestEntry, RoutingMetadata};
use crate::config::ManifestConfig;
use crate::domain::{Report, ReportFile};

/// Builds manifests from configured classification metadata
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    config: ManifestConfig,
}

impl ManifestBuilder {
    /// Create a new builder
    pub fn new(config: ManifestConfig) -> Self {
        Self { config }
    }

    /// Build the manifest for a report and its files
    ///
    /// Deterministic: the same report and files always yield the same manifest.
    pub fn build(&self, report: &Report, files: &[ReportFile]) -> Manifest {
        Manifest {
            report_id: report.id.clone(),
            routing: RoutingMetadata {
                entity: self.config.entity.clone(),
                application: self.config.application.clone(),
            },
            key: self.config.key.clone(),
            flow: self.config.flow.clone(),
            entries: files
                .iter()
                .map(|file| ManifestEntry {
                    name: file.name.clone(),
                })
                .collect(),
        }
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new(ManifestConfig::default())
    }
}
