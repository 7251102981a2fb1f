//! Packaging outcomes
//!
//! The result of one packaging attempt, before any status is written.

use crate::domain::{ArchiveError, ManifestError, Package, StoreError};
use serde::Serialize;
use std::fmt;

/// Why a packaging attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The report does not have the required number of files
    FileCountMismatch { expected: usize, actual: usize },
    /// An input file could not be resolved or read
    SourceUnavailable { detail: String },
    /// The manifest could not be built or staged
    ManifestBuild { detail: String },
    /// The archive could not be written
    ArchiveWrite { detail: String },
    /// A store read or write failed
    StoreUnavailable { detail: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileCountMismatch { expected, actual } => {
                write!(f, "expected {expected} files, found {actual}")
            }
            Self::SourceUnavailable { detail } => write!(f, "source unavailable: {detail}"),
            Self::ManifestBuild { detail } => write!(f, "manifest build failed: {detail}"),
            Self::ArchiveWrite { detail } => write!(f, "archive write failed: {detail}"),
            Self::StoreUnavailable { detail } => write!(f, "store unavailable: {detail}"),
        }
    }
}

impl From<ArchiveError> for FailureReason {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::SourceUnavailable { .. } | ArchiveError::InvalidLocation { .. } => {
                Self::SourceUnavailable {
                    detail: err.to_string(),
                }
            }
            ArchiveError::Write { .. } => Self::ArchiveWrite {
                detail: err.to_string(),
            },
        }
    }
}

impl From<ManifestError> for FailureReason {
    fn from(err: ManifestError) -> Self {
        Self::ManifestBuild {
            detail: err.to_string(),
        }
    }
}

impl From<StoreError> for FailureReason {
    fn from(err: StoreError) -> Self {
        Self::StoreUnavailable {
            detail: err.to_string(),
        }
    }
}

/// Outcome of packaging one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackagingOutcome {
    /// The archive was written; the package still has to be registered
    Packaged(Package),
    /// The attempt failed
    Failed(FailureReason),
}

impl PackagingOutcome {
    /// Whether the attempt produced a package
    pub fn is_packaged(&self) -> bool {
        matches!(self, Self::Packaged(_))
    }
}
