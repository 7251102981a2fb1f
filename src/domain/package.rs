//! Package domain model

use super::ids::PackageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The archive produced for a report
///
/// Immutable once written and referenced by exactly one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Generated package id
    pub id: PackageId,

    /// Storage location of the archive (`share://` URL)
    pub location: String,

    /// Archive size in bytes
    pub size_bytes: u64,

    /// SHA-256 of the archive bytes, hex encoded
    pub checksum: String,

    /// When the archive was finalized
    pub created_at: DateTime<Utc>,
}
